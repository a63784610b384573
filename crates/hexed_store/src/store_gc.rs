use itertools::Itertools as _;

use crate::{ChunkId, FileStore, FileStoreError, FileStoreResult};

// ---

impl FileStore {
    /// What the eviction budget is charged: resident count times page size.
    ///
    /// Short EOF tails are charged for their whole nominal page; budget math
    /// stays in whole pages.
    #[inline]
    pub fn chunk_memory_declared(&self) -> u64 {
        self.chunks.len() as u64 * self.config.chunk_size
    }

    /// Evicts chunks, lowest eviction key first, until the memory budget
    /// holds or only `pinned` chunks remain.
    ///
    /// The eviction key is `last_touched_ms + touched`: recency dominates
    /// (milliseconds dwarf touch counts), the touch count separates chunks
    /// loaded within the same millisecond and gives mildly-hot pages a
    /// nudge. Never-touched chunks go first: loaded but never read. Ties
    /// break by ascending id.
    ///
    /// `pinned` is typically the chunk the caller just loaded: it is the
    /// immediate cause of the over-budget condition, and evicting it would
    /// thrash.
    pub fn cleanup_chunks(&mut self, pinned: &[ChunkId]) {
        if self.chunk_memory_declared() <= self.config.max_chunk_memory {
            return;
        }

        self.cleanup_id += 1;
        let num_chunks_before = self.chunks.len();

        let candidates = self
            .chunks
            .iter()
            .filter(|&(id, _)| !pinned.contains(id))
            .map(|(id, chunk)| {
                let key = chunk.last_touched_ms.map(|ms| ms + chunk.touched);
                (key.is_some(), key.unwrap_or(0), *id)
            })
            .sorted_unstable()
            .map(|(_, _, id)| id);

        for id in candidates {
            if self.chunk_memory_declared() <= self.config.max_chunk_memory {
                break;
            }
            self.chunks.remove(&id);
        }

        log::trace!(
            "eviction pass {}: {} -> {} resident chunks ({} pinned, budget {})",
            self.cleanup_id,
            num_chunks_before,
            self.chunks.len(),
            pinned.len(),
            self.config.max_chunk_memory,
        );
    }

    /// Drops every resident chunk. The next reads re-load from the file.
    ///
    /// A destructive save runs this: the file changed underneath the cache.
    pub fn invalidate_chunks(&mut self) {
        log::debug!("invalidating {} resident chunks", self.chunks.len());
        self.chunks.clear();
    }

    /// Evicts a single chunk by id, failing if it isn't resident.
    pub fn destroy_chunk(&mut self, id: ChunkId) -> FileStoreResult<()> {
        self.chunks
            .remove(&id)
            .map(|_| ())
            .ok_or(FileStoreError::UnknownChunkId(id))
    }
}

// ---
