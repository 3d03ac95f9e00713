//! Overlay table codec
//!
//! Converts between an in-memory directory tree and the table literal the
//! addon loads at startup, and parses the overlay table the game writes back.

pub mod decoder;
pub mod encoder;
pub mod escape;

pub use decoder::{decode, TreeDecoder, ROOT_SLOT};
pub use encoder::{encode, render_assignment};
