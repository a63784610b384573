//! The in-memory edit journal backing `hexed`.
//!
//! * See [`EditJournal`] for an overview of the core datastructure.
//! * See [`EditJournal::read`] for the overlay read semantics.
//! * See [`EditJournal::undo`] and [`EditJournal::redo`] for history
//!   navigation.

mod journal;
mod stats;
mod types;

pub use self::journal::{EditEntry, EditJournal};
pub use self::stats::JournalStats;
pub use self::types::{AbsoluteFilePosition, Buffer, Byte, FilePosition};
