//! A journaled, chunk-cached byte editing core for arbitrarily large files.
//!
//! [`FileStore`] is the back-end an interactive hex editor builds on. It
//! presents a single "edited view" of a file: reads go through the in-memory
//! [`EditJournal`] overlay first and fall back to fixed-size aligned pages
//! cached under a memory budget; edits never touch the file until an
//! explicit destructive save.
//!
//! * See [`FileStore::read`] and [`FileStore::read_raw`] for the read path.
//! * See [`FileStore::edit`], [`FileStore::undo`] and [`FileStore::redo`]
//!   for the editing surface.
//! * See [`FileStore::save_history_destructive`] for writing edits back.

mod chunk;
mod store;
mod store_gc;
mod store_read;
mod store_stats;
mod store_write;

pub use self::chunk::{Chunk, ChunkId, ChunkSize};
pub use self::store::{FileStore, FileStoreConfig, FileStoreError, FileStoreResult};
pub use self::store_stats::FileStoreStats;

// Re-exports
#[doc(no_inline)]
pub use hexed_journal::{
    AbsoluteFilePosition, Buffer, Byte, EditEntry, EditJournal, FilePosition, JournalStats,
};
