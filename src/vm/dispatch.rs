/*!
dispatch: routes a decoded opcode (with its already-sliced argument bytes)
to the right family handler (spec §4.7 "Command dispatch").

Mirrors the `switch(GetCommandType(cmd))` in `lib/cmd_exec.cpp::Cycle`,
reassembled into `vm::opcode::family_of`. `get.string` is the one opcode
that can yield a [`UserActionRequest`], so it is special-cased here ahead
of the generic family match rather than threading a return value through
every other handler.
*/

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::vm::frame::UserActionRequest;
use crate::vm::handlers::{
    arithmetic, misc, object_description, object_motion, picture_management, program_control,
    text_management,
};
use crate::vm::opcode::{family_of, Family};

const GET_STRING: u8 = 115;

pub fn execute(interp: &mut Interpreter, cmd: u8, args: &[u8]) -> Result<Option<UserActionRequest>> {
    if cmd == GET_STRING {
        return Ok(text_management::get_string(interp, args));
    }

    match family_of(cmd) {
        Family::Arithmetic => arithmetic::exec(interp, cmd, args)?,
        Family::Resource => program_control::exec_resource(interp, cmd, args)?,
        Family::ProgramControl => program_control::exec(interp, cmd, args)?,
        Family::ObjectDescription => object_description::exec(interp, cmd, args)?,
        Family::ObjectMotion => object_motion::exec(interp, cmd, args)?,
        Family::Picture => picture_management::exec(interp, cmd, args)?,
        Family::Text => text_management::exec(interp, cmd, args)?,
        Family::Misc => misc::exec(interp, cmd, args)?,
    }
    Ok(None)
}
