/*!
exec: the fetch-decode loop (spec §4.7 "Command dispatch").

Grounded directly on `lib/cmd_exec.cpp::Interpreter::Cycle`: `0xFF` is an
if-form (condition grammar followed by a 2-byte field — skip it on success,
add it *to* the post-field position on failure), `0xFE` is an unconditional
signed jump, `0x00` (`return`) pops the frame, and everything else is
fetched with its fixed arity and handed to `dispatch::execute`.
*/

use crate::error::{AgiError, Result};
use crate::interpreter::Interpreter;
use crate::vm::{condition, dispatch, opcode};
use crate::vm::frame::UserActionRequest;

fn read_u16(code: &[u8], ip: &mut usize) -> Result<u16> {
    let lo = *code.get(*ip).ok_or(AgiError::TruncatedScript)?;
    let hi = *code.get(*ip + 1).ok_or(AgiError::TruncatedScript)?;
    *ip += 2;
    Ok(u16::from_le_bytes([lo, hi]))
}

/// Run the VM until the frame stack empties or a command yields a
/// [`UserActionRequest`] (spec §5 "Suspension points").
pub fn run_cycle(interp: &mut Interpreter) -> Result<Option<UserActionRequest>> {
    loop {
        let Some(frame) = interp.stack.last() else {
            return Ok(None);
        };
        let script = frame.script.clone();
        let mut ip = frame.ip;
        let code = script.code();

        if ip >= code.len() {
            // Ran off the end of the script buffer without an explicit
            // `return` — terminate this frame, matching the original's
            // "ip >= code.size()" guard (lib/cmd_exec.cpp::Cycle).
            interp.stack.pop();
            continue;
        }

        let cmd = code[ip];
        ip += 1;

        if cmd == 0xFF {
            let taken = condition::eval_and(&*interp, code, &mut ip)?;
            if taken {
                ip += 2;
            } else {
                let distance = read_u16(code, &mut ip)?;
                ip = ip.wrapping_add(distance as usize);
            }
            interp.stack.last_mut().expect("frame present").ip = ip;
            continue;
        }

        if cmd == 0xFE {
            let distance = read_u16(code, &mut ip)? as i16;
            ip = (ip as i64 + distance as i64) as usize;
            interp.stack.last_mut().expect("frame present").ip = ip;
            continue;
        }

        if cmd == 0x00 {
            // return
            interp.stack.pop();
            continue;
        }

        let argc = opcode::arity(cmd) as usize;
        if ip + argc > code.len() {
            return Err(AgiError::TruncatedScript);
        }
        let args: Vec<u8> = code[ip..ip + argc].to_vec();
        ip += argc;
        // Write the advance back before dispatching: `call`/`call.v` push a
        // new frame on top of this one, so the caller's resume point must
        // already be recorded.
        interp.stack.last_mut().expect("frame present").ip = ip;

        if let Some(uar) = dispatch::execute(interp, cmd, &args)? {
            return Ok(Some(uar));
        }
    }
}
