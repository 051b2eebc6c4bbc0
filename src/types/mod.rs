//! Core types shared by agents and transports.

pub mod message;
pub mod tool;
pub mod turn;

pub use message::*;
pub use tool::*;
pub use turn::*;
