pub mod config;
pub mod index;

pub use config::Config;
pub use index::*;
