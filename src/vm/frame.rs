/*!
frame: the script execution stack (spec §3 "VM state", §4.7 "Frame").
*/

use std::rc::Rc;

use crate::resource::Script;

/// One entry on the logic VM's call stack: which script is executing and
/// where its instruction pointer currently sits.
#[derive(Clone)]
pub struct Frame {
    pub script: Rc<Script>,
    pub ip: usize,
}

impl Frame {
    pub fn new(script: Rc<Script>) -> Self {
        Self { script, ip: 0 }
    }
}

/// The single externally-visible VM suspension point (spec §5): a
/// string-input opcode yields this back to the driver instead of running
/// to completion. Everything beyond "which variable wants text and how
/// long the buffer is" is host UI, out of scope here (spec §1).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UserActionRequest {
    pub string_index: u8,
    pub max_len: u8,
}
