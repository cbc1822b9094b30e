//! Utility module

mod error;
mod span;

pub use error::{Error, Result, Stage};
pub use span::Span;
