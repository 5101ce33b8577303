/*!
program_control: room transitions, script calls, and resource-directory
loads (spec §4.7 "Program control" / "Resource management"). Grounded on
`lib/cmd_exec.cpp::ProgramControlCommand` and `::ResourceManagementCommand`.
`return` is handled directly in `vm::exec`'s fetch loop, not here, since it
pops the call stack rather than running a command body.
*/

use crate::error::Result;
use crate::interpreter::Interpreter;

pub fn exec(interp: &mut Interpreter, cmd: u8, args: &[u8]) -> Result<()> {
    match cmd {
        18 => interp.new_room(args[0]),      // new.room(n)
        19 => {
            // new.room.v(n)
            let room = interp.var(args[0]);
            interp.new_room(room);
        }
        22 => interp.call(args[0])?, // call(n)
        23 => {
            // call.v(n)
            let logic = interp.var(args[0]);
            interp.call(logic)?;
        }
        _ => {}
    }
    Ok(())
}

/// `load.pic`/`discard.pic`/`load.view`/`load.view.v`/`discard.view`/
/// `discard.view.v`/`load.sound` are empty stubs in the original too — every
/// one of those resources is loaded lazily (and cached) the first time
/// `draw.pic`/`set.view`/etc. actually needs it, so there is nothing for an
/// eager "load" command to do ahead of time. `load.logics`/`load.logics.v`
/// are the one pair the original implements for real, so this core does
/// too.
pub fn exec_resource(interp: &mut Interpreter, cmd: u8, args: &[u8]) -> Result<()> {
    match cmd {
        20 => interp.load_logic(args[0])?, // load.logics(n)
        21 => {
            // load.logics.v(n)
            let n = interp.var(args[0]);
            interp.load_logic(n)?;
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_room_resets_the_room_scoped_variables() {
        let mut interp = Interpreter::for_tests();
        interp.set_var(crate::interpreter::var::CURRENT_ROOM, 3);
        interp.set_var(crate::interpreter::var::EGO_TOUCH_CODE, 7);
        exec(&mut interp, 18, &[5]).unwrap();
        assert_eq!(interp.var(crate::interpreter::var::CURRENT_ROOM), 5);
        assert_eq!(interp.var(crate::interpreter::var::PREVIOUS_ROOM), 3);
        assert_eq!(interp.var(crate::interpreter::var::EGO_TOUCH_CODE), 0);
    }
}
