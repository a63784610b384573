use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use nohash_hasher::IntMap;

use hexed_journal::{AbsoluteFilePosition, EditJournal, FilePosition};

use crate::{Chunk, ChunkId, ChunkSize};

// ---

/// Everything that can go wrong inside a [`FileStore`].
///
/// All I/O failures surface to the caller; the store recovers from none of
/// them internally except the EOF-shrink retry in the chunk loader. After a
/// failed read the cache is consistent (the half-formed chunk was dropped);
/// after a failed destructive save the file may be partially written.
#[derive(thiserror::Error, Debug)]
pub enum FileStoreError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to close the underlying file: {0}")]
    Close(#[source] std::io::Error),

    #[error("failed to stat the underlying file: {0}")]
    Stat(#[source] std::io::Error),

    #[error("failed to seek to absolute position {pos}: {source}")]
    Seek {
        pos: AbsoluteFilePosition,
        source: std::io::Error,
    },

    #[error("failed to read {len} bytes at absolute position {pos}: {source}")]
    Read {
        pos: AbsoluteFilePosition,
        len: u64,
        source: std::io::Error,
    },

    #[error(
        "EOF retry failed: the shrunk read of {len} bytes at absolute position {pos} still came up short"
    )]
    EofRetry {
        pos: AbsoluteFilePosition,
        len: u64,
    },

    #[error("failed to write {len} bytes at absolute position {pos}: {source}")]
    Write {
        pos: AbsoluteFilePosition,
        len: u64,
        source: std::io::Error,
    },

    #[error("failed to copy {from:?} to {to:?}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("no resident chunk with id {0}")]
    UnknownChunkId(ChunkId),
}

pub type FileStoreResult<T> = Result<T, FileStoreError>;

// ---

/// Construction options for a [`FileStore`].
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Whether [`FileStore::save_history_destructive`] may touch the file.
    ///
    /// Also selects the mode the file is opened in.
    pub allow_writing: bool,

    /// Absolute offset at which session-relative position 0 lies.
    ///
    /// Together with `end_position` this windows the session onto a slice of
    /// the file.
    pub start_position: AbsoluteFilePosition,

    /// Absolute upper bound of the session window; reads at or past it
    /// return `None`.
    pub end_position: Option<AbsoluteFilePosition>,

    /// Eviction budget for resident chunks, in bytes.
    ///
    /// Pick at least `3 * chunk_size` so a few pages stay resident around
    /// the access point and hide load latency.
    ///
    /// See [`Self::DEFAULT`] for defaults.
    pub max_chunk_memory: u64,

    /// Page size, in bytes. Every chunk starts at a multiple of this.
    ///
    /// Smaller pages mean more file round-trips but a finer-grained budget.
    pub chunk_size: ChunkSize,
}

impl Default for FileStoreConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FileStoreConfig {
    pub const DEFAULT: Self = Self {
        allow_writing: false,
        start_position: 0,
        end_position: None,
        max_chunk_memory: 10 * 1024,
        chunk_size: 1024,
    };
}

// ---

/// A journaled, chunk-cached view over a single file.
///
/// Reads hit the [`EditJournal`] overlay first and fall back to fixed-size
/// aligned pages loaded on demand from the file; edits only ever touch the
/// journal until [`Self::save_history_destructive`] writes them back.
///
/// The store owns the file handle for the whole session and is
/// single-threaded: every operation runs to completion on the caller's
/// thread.
pub struct FileStore {
    pub(crate) config: FileStoreConfig,
    pub(crate) path: PathBuf,
    pub(crate) file: File,

    /// Every recorded edit lives here until saved.
    pub(crate) journal: EditJournal,

    /// All resident chunks. Ids are never reused; ordering is irrelevant.
    pub(crate) chunks: IntMap<ChunkId, Chunk>,

    /// Monotonic [`ChunkId`] allocator.
    pub(crate) chunk_id_counter: u64,

    /// Monotonically increasing id for eviction passes.
    pub(crate) cleanup_id: u64,
}

impl FileStore {
    /// Opens `path` (read-only unless `config.allow_writing`) with an empty
    /// journal and an empty cache.
    pub fn open(path: impl Into<PathBuf>, config: FileStoreConfig) -> FileStoreResult<Self> {
        let path = path.into();
        let file = Self::open_file(&path, config.allow_writing)?;

        log::debug!("opened {path:?} (writable: {})", config.allow_writing);

        Ok(Self {
            config,
            path,
            file,
            journal: EditJournal::new(),
            chunks: IntMap::default(),
            chunk_id_counter: 0,
            cleanup_id: 0,
        })
    }

    pub(crate) fn open_file(path: &Path, writable: bool) -> FileStoreResult<File> {
        OpenOptions::new()
            .read(true)
            .write(writable)
            .open(path)
            .map_err(|source| FileStoreError::Open {
                path: path.to_owned(),
                source,
            })
    }

    /// Flushes and closes the underlying file, dropping the journal and all
    /// resident chunks. Unsaved edits are lost.
    pub fn close(mut self) -> FileStoreResult<()> {
        log::debug!("closing {:?}", self.path);

        self.journal.clear();
        self.chunks.clear();

        self.file.sync_all().map_err(FileStoreError::Close)
    }

    /// Size of the underlying file, in bytes.
    pub fn file_size(&self) -> FileStoreResult<u64> {
        Ok(self.file.metadata().map_err(FileStoreError::Stat)?.len())
    }

    /// One past the last readable session-relative position: the file size
    /// (or the window's end, whichever is lower), rebased onto the window's
    /// start.
    pub fn file_end(&self) -> FileStoreResult<FilePosition> {
        let size = self.file_size()?;
        let end = self.config.end_position.map_or(size, |end| end.min(size));
        Ok(end.saturating_sub(self.config.start_position))
    }

    #[inline]
    pub fn config(&self) -> &FileStoreConfig {
        &self.config
    }

    /// Path of the file this session is editing.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn start_position(&self) -> AbsoluteFilePosition {
        self.config.start_position
    }

    /// Read-only access to the edit journal (stats, entry inspection).
    #[inline]
    pub fn journal(&self) -> &EditJournal {
        &self.journal
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn has_chunks(&self) -> bool {
        !self.chunks.is_empty()
    }

    #[inline]
    pub fn has_chunk(&self, id: ChunkId) -> bool {
        self.chunks.contains_key(&id)
    }

    /// The resident chunk behind `id`, if it hasn't been evicted.
    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(&id)
    }

    pub(crate) fn alloc_chunk_id(&mut self) -> ChunkId {
        let id = ChunkId(self.chunk_id_counter);
        self.chunk_id_counter += 1;
        id
    }

    /// Absolute file position backing session-relative `pos`.
    #[inline]
    pub(crate) fn absolute(&self, pos: FilePosition) -> AbsoluteFilePosition {
        self.config.start_position + pos
    }
}
