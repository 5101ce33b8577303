#![doc = r#"
AGI interpreter core library crate.

This crate exposes the interpreter's modules for use by binaries and tests.

Modules:
- error: the `AgiError` taxonomy shared by every fallible boundary
- resource: directories, volumes, resource framing, and the script/view parsers
- vm: the logic virtual machine — fetch/decode, conditionals, and command dispatch
- world: the game-object table and its sprite compositor
- render: the picture/priority framebuffer and the vector picture decoder
- interpreter: the cycle state machine and public driver API

In tests, a synthetic in-memory resource set builder is available under
`crate::test_utils`.
"#]

pub mod error;
pub mod interpreter;
pub mod render;
pub mod resource;
pub mod vm;
pub mod world;

pub use error::AgiError;
pub use interpreter::Interpreter;
pub use vm::frame::UserActionRequest;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
