//! Error types

mod collaborator;
mod grid;

pub use collaborator::*;
pub use grid::*;
