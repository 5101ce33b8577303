/*!
misc: the catch-all family (spec §4.7) — inventory, sound, string (other
than `get.string`), initialization, and menu opcodes, plus `show.pri.screen`
and every opcode this core doesn't classify elsewhere. Per spec §1/§7 these
are "recognised, consume their arguments, and otherwise have no semantic
effect": the arity table in `vm::opcode` already advances the fetch
pointer by the right number of bytes before this is ever called, so there
is nothing left to do here.
*/

use crate::error::Result;
use crate::interpreter::Interpreter;

pub fn exec(_interp: &mut Interpreter, _cmd: u8, _args: &[u8]) -> Result<()> {
    Ok(())
}
