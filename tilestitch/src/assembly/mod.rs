//! Grid assembly: validating a tile grid and concatenating it.
//!
//! - [`GridLayout`] - measured, validated shape of a grid; also splits a
//!   composite back into tiles
//! - [`GridAssembler`] - builds the composite image
//! - [`DimensionMismatch`] - why a grid cannot be assembled

mod assembler;
mod layout;

pub use assembler::{Composite, GridAssembler};
pub use layout::{DimensionMismatch, GridLayout, Span};
