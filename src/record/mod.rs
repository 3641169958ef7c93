//! Record types.
//!
//! - [`Record`] - A finished record with its stream offset

mod data;

pub use data::Record;
