//! Record assembly: turning delimiter-bounded pieces into records.
//!
//! The splitter only finds delimiters. Deciding which pieces belong together
//! and what a finished record looks like is delegated to a
//! [`RecordAssembler`].
//!
//! - [`RecordAssembler`] - The collaborator contract the splitter drives
//! - [`PieceAssembler`] - Every piece is its own [`Record`](crate::Record)
//! - [`GroupingAssembler`] - A predicate decides where records begin

mod builtin;
mod contract;

pub use builtin::{GroupingAssembler, PieceAssembler, RecordBuilder};
pub use contract::RecordAssembler;
