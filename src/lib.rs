pub use faer;

mod activation;
mod config;
mod error;
mod gym;
mod nn;
mod pretty_print;

pub mod core;

pub use activation::*;
pub use config::*;
pub use crate::core::Layer;
pub use error::{ConfigError, Error, Result, ShapeError};
pub use gym::*;
pub use nn::*;
pub use pretty_print::*;
