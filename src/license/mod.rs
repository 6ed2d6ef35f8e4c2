//! License copyright-year transformation engine
//!
//! Pure text in, text out. No I/O happens here:
//!
//! - **dialect**: named notice rules and the ordered built-in registry
//! - **pattern**: validation of the user-supplied `transform` pattern
//! - **transform**: dialect selection and year substitution

pub mod dialect;
pub mod pattern;
pub mod transform;

pub use dialect::{Dialect, YearShape, builtin_dialects};
pub use pattern::validate_custom_pattern;
pub use transform::{apply_transform, transform};
