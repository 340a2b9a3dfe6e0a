//! Utility types shared by all accessor views.
//!
//! This module contains fundamental types used throughout the library:
//! - [`EncodingType`] - Enum of wire-level component encodings
//! - [`AttributeFormat`] - Encoding + normalization + dimensions
//! - [`AccessorLayout`] - Placement of an accessor in a byte region
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam

mod encoding;
mod format;
mod error;
mod math;

pub use encoding::*;
pub use format::*;
pub use error::*;
pub use math::*;
