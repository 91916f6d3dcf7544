//! Platform independent model of the memory board: piece layout, the click state machine and the match service
//! wire format.

pub use board::*;
pub use config::*;
pub use error::*;
pub use hud::*;
pub use layout::*;
pub use piece::*;
pub use protocol::*;
pub use session::*;
pub use types::*;

mod board;
mod config;
mod error;
mod hud;
mod layout;
mod piece;
mod protocol;
mod session;
mod types;
