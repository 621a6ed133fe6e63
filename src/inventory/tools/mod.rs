pub mod address;
pub mod build;
pub mod columns;
pub mod config;
pub mod error;
pub mod hosts;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod sync;
pub mod validate;

pub use error::{Result, ToolError};
