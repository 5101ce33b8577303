/*!
text_management: message selection, the text-window screen toggle, and the
one opcode that suspends the VM for player text entry (spec §4.7 "Text
management", §5 "Suspension points"). Grounded on
`lib/cmd_exec.cpp::TextManagementCommand`/`StringManagementCommand` and
`lib/interpreter.cpp::DisplayMessage`. There is no glyph rasterizer here
(spec §1 Non-goals), so `text.screen`/`graphics`/`set.cursor.char`/
`status.line.on` — all screen-mode toggles with nothing to paint — stay
documented no-ops, while `print`/`print.v`/`display`/`display.v` still do
real work: they resolve a message and record it.
*/

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::vm::frame::UserActionRequest;

pub fn exec(interp: &mut Interpreter, cmd: u8, args: &[u8]) -> Result<()> {
    match cmd {
        101 => interp.display_message(args[0]), // print(n)
        102 => {
            // print.v(varN)
            let n = interp.var(args[0]);
            interp.display_message(n);
        }
        103 => interp.display_message(args[0]), // display(n, x, y)
        104 => {
            // display.v(varN, x, y)
            let n = interp.var(args[0]);
            interp.display_message(n);
        }
        105 => {
            // clear.lines(top, bottom, color)
            interp.framebuffer_clear_lines(args[0], args[1], args[2]);
        }
        106 | 107 | 108 | 112 => {} // text.screen / graphics / set.cursor.char / status.line.on
        119 => interp.accepting_input = false, // prevent.input
        120 => interp.accepting_input = true,  // accept.input
        _ => {}
    }
    Ok(())
}

/// `get.string(n, m, x, y, l)`: the sole suspension point (spec §5) — the
/// interpreter cannot manufacture player-typed text, so running this
/// opcode always hands control back to the host.
pub fn get_string(_interp: &mut Interpreter, args: &[u8]) -> Option<UserActionRequest> {
    Some(UserActionRequest { string_index: args[0], max_len: args[1] })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn prevent_then_accept_input_round_trips() {
        let mut interp = Interpreter::for_tests();
        exec(&mut interp, 119, &[]).unwrap();
        assert!(!interp.accepting_input());
        exec(&mut interp, 120, &[]).unwrap();
        assert!(interp.accepting_input());
    }

    #[test]
    fn get_string_always_requests_input() {
        let mut interp = Interpreter::for_tests();
        let uar = get_string(&mut interp, &[3, 40, 0, 0, 0]).unwrap();
        assert_eq!(uar.string_index, 3);
        assert_eq!(uar.max_len, 40);
    }
}
