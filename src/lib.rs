pub mod config;
pub mod error;
pub mod model;
pub mod pairing;
pub mod store;
pub mod xlsx;

pub use error::{ArenaError, Result};
pub use model::*;
