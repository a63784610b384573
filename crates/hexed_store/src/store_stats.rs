use hexed_journal::JournalStats;

use crate::FileStore;

// ---

/// Snapshot of the cache side of a [`FileStore`].
///
/// The journal side lives in [`JournalStats`]; see
/// [`FileStore::journal_stats`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStoreStats {
    /// Resident chunks.
    pub num_chunks: u64,

    /// What the eviction budget is charged: `num_chunks * chunk_size`.
    pub chunk_memory_declared: u64,

    /// Bytes actually resident, which is lower than declared when a short
    /// EOF tail is cached.
    pub chunk_memory_resident: u64,

    /// The eviction budget.
    pub max_chunk_memory: u64,
}

impl std::fmt::Display for FileStoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            num_chunks,
            chunk_memory_declared,
            chunk_memory_resident,
            max_chunk_memory,
        } = *self;

        writeln!(f, "resident chunks: {num_chunks}")?;
        writeln!(
            f,
            "chunk memory: {chunk_memory_declared} B declared, {chunk_memory_resident} B resident, {max_chunk_memory} B budget",
        )?;

        Ok(())
    }
}

// ---

impl FileStore {
    /// Computes a snapshot of the cache's occupancy.
    pub fn stats(&self) -> FileStoreStats {
        FileStoreStats {
            num_chunks: self.chunks.len() as u64,
            chunk_memory_declared: self.chunk_memory_declared(),
            chunk_memory_resident: self
                .chunks
                .values()
                .map(|chunk| chunk.data().len() as u64)
                .sum(),
            max_chunk_memory: self.config.max_chunk_memory,
        }
    }

    /// Computes a snapshot of the journal's counters.
    #[inline]
    pub fn journal_stats(&self) -> JournalStats {
        self.journal.stats()
    }
}
