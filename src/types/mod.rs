//! Core data types shared across the library.
//!
//! - [`DesignNode`] - Node of the design specification tree
//! - [`RenderedElement`] - Element measured on the live page
//! - [`Geometry`] - Absolute rectangle
//! - [`ComparisonResult`], [`Difference`], [`Summary`] - Comparison output

pub mod core;
pub mod design;
pub mod dom;
pub mod results;

pub use self::core::{Geometry, Viewport};
pub use design::DesignNode;
pub use dom::{display_name, RenderedElement};
pub use results::{ComparisonResult, DiffValue, Difference, Summary};
