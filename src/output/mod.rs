//! Run reports
//!
//! - `text`: console report printed at the end of a run
//! - `json`: machine-readable run report written on request

pub mod json;
pub mod text;
