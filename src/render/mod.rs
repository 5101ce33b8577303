/*!
render: the picture/priority framebuffer and the vector picture decoder
(spec §3, §4.6).
*/

pub mod framebuffer;
pub mod picture;

pub use framebuffer::Framebuffer;
