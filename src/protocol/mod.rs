//! Text exchanged with a connected client.

mod messages;

pub use messages::*;
