/*!
vm: the logic virtual machine — instruction fetch, the two-level
conditional grammar, command dispatch, and the script call stack
(spec §4.7).

`exec::run_cycle` drives the fetch-decode loop against an `Interpreter`
(defined in `crate::interpreter`); `opcode` supplies arity and family
lookups; `dispatch` routes a decoded opcode to the right `handlers`
submodule; `condition` and `frame` are the grammar evaluator and call-stack
entry respectively.
*/

pub mod condition;
pub mod dispatch;
pub mod exec;
pub mod frame;
pub mod handlers;
pub mod opcode;

pub use condition::ConditionHost;
pub use frame::{Frame, UserActionRequest};
