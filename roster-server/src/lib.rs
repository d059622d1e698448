pub mod config;
pub mod host;
mod validation;

pub use host::{LocalSession, StandaloneHost};
