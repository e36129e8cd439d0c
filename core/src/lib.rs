//! Deterministic core of a swap-and-match puzzle board.
//!
//! The crate owns the board, goals and move budget and never talks to a renderer. A
//! presenter feeds swap requests into a [`Session`], advances resolution with
//! [`Session::step`] at whatever pace its animations need, and reads back what happened
//! from the queued [`GameEvent`]s.

#![no_std]

extern crate alloc;

pub use board::*;
pub use cascade::*;
pub use error::*;
pub use event::*;
pub use level::*;
pub use matcher::*;
pub use piece::*;
pub use session::*;
pub use spawn::*;
pub use swap::*;
pub use types::*;

mod board;
mod cascade;
mod error;
mod event;
mod level;
mod matcher;
mod piece;
mod session;
mod spawn;
mod swap;
mod types;
