/*!
picture_management: decode and publish room pictures (spec §4.7 "Picture
management", §4.6). Grounded on `lib/cmd_exec.cpp::PictureManagementCommand`,
where `draw.pic`/`overlay.pic` both dereference their argument through
`variables_[]` before calling into the picture decoder — the picture number
lives in a variable, not the opcode's immediate byte.
*/

use crate::error::Result;
use crate::interpreter::Interpreter;

pub fn exec(interp: &mut Interpreter, cmd: u8, args: &[u8]) -> Result<()> {
    match cmd {
        25 => {
            // draw.pic(varN)
            let n = interp.var(args[0]);
            interp.draw_pic(n)?;
        }
        26 => interp.show_pic(), // show.pic()
        28 => {
            // overlay.pic(varN)
            let n = interp.var(args[0]);
            interp.overlay_pic(n)?;
        }
        _ => {}
    }
    Ok(())
}
