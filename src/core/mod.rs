//! Core parts of the algorithms: one dense layer and its own passes.

mod back_propagation;
mod forward;
mod layer;

pub use layer::*;
