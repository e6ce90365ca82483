pub use analysis::*;
pub use board::*;
pub use cell::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use types::*;

mod analysis;
mod board;
mod cell;
mod config;
mod error;
mod game;
mod generator;
mod types;
