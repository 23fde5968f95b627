//! Core abstractions for class diagram processing
//!
//! This module defines the traits shared by every pipeline stage together
//! with the common error, configuration and logging infrastructure.

mod config;
mod database;
mod error;
pub mod logging;
mod parser;
mod renderer;
mod types;

pub use config::*;
pub use database::*;
pub use error::*;
pub use logging::*;
pub use parser::*;
pub use renderer::*;
pub use types::*;
