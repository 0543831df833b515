pub mod caller;
pub mod catalogue;
pub mod cli;
pub mod config;
pub mod error;
pub mod protocol;
pub mod schedule;
pub mod transport;

pub use error::TendrilError;
