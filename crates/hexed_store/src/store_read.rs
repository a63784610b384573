use std::io::{Read as _, Seek as _, SeekFrom};

use hexed_journal::{Byte, FilePosition};

use crate::{Chunk, ChunkId, ChunkSize, FileStore, FileStoreError, FileStoreResult};

// ---

impl FileStore {
    /// Largest chunk-aligned position at or below `pos`: the start of the
    /// page that covers it.
    #[inline]
    pub fn aligned_chunk_start(&self, pos: FilePosition) -> FilePosition {
        pos - pos % self.config.chunk_size
    }

    /// Chunk-aligned position nearest to `pos`; half-way rounds up.
    #[inline]
    pub fn nearest_aligned_chunk_start(&self, pos: FilePosition) -> FilePosition {
        let down = self.aligned_chunk_start(pos);
        if (pos - down) * 2 < self.config.chunk_size {
            down
        } else {
            down + self.config.chunk_size
        }
    }

    /// Id of the resident chunk whose declared range covers `pos`.
    ///
    /// Declared, not actual: a short EOF tail still owns its whole nominal
    /// page, so queries past its data don't keep re-loading it.
    pub fn find_chunk(&self, pos: FilePosition) -> Option<ChunkId> {
        self.chunks
            .iter()
            .find_map(|(id, chunk)| chunk.covers(pos).then_some(*id))
    }

    /// Allocates a fresh chunk for the aligned page at `start` and fills it
    /// from the file.
    ///
    /// `start` must not be covered by any resident chunk; loading over one
    /// is a bug in the caller.
    pub(crate) fn load_chunk(
        &mut self,
        start: FilePosition,
        read_size: ChunkSize,
    ) -> FileStoreResult<ChunkId> {
        debug_assert_eq!(start % self.config.chunk_size, 0);
        debug_assert!(
            self.find_chunk(start).is_none(),
            "chunk at {start} is already (at least partially) loaded"
        );

        let id = self.alloc_chunk_id();
        self.chunks.insert(id, Chunk::new(start, self.config.chunk_size));

        log::trace!("loading chunk {id} for positions {start}..{}", start + read_size);

        self.load_into_chunk(start, read_size, id, false)?;

        Ok(id)
    }

    /// Reads `size` bytes at `start` into chunk `id`, shrinking the read
    /// once if the file ends mid-page.
    ///
    /// The first pass asks for the full page; if the file comes up short the
    /// retry asks for exactly the bytes that are there, which must succeed
    /// cleanly: a second short read means the file shrank underneath the
    /// session. Either way the chunk ends up holding exactly the bytes that
    /// exist, and its declared size keeps claiming the whole page.
    fn load_into_chunk(
        &mut self,
        start: FilePosition,
        size: ChunkSize,
        id: ChunkId,
        eof_retry: bool,
    ) -> FileStoreResult<()> {
        let pos = self.absolute(start);

        self.file
            .seek(SeekFrom::Start(pos))
            .map_err(|source| FileStoreError::Seek { pos, source })?;

        let Some(chunk) = self.chunks.get_mut(&id) else {
            return Err(FileStoreError::UnknownChunkId(id));
        };
        chunk.data.resize(size as usize, 0);

        match self.file.read_exact(&mut chunk.data) {
            Ok(()) => Ok(()),

            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                if eof_retry {
                    self.chunks.remove(&id);
                    return Err(FileStoreError::EofRetry { pos, len: size });
                }
                let available = self.file_size()?.saturating_sub(pos);
                self.load_into_chunk(start, available.min(size), id, true)
            }

            Err(source) => {
                // Drop the half-formed chunk so the cache stays consistent.
                self.chunks.remove(&id);
                Err(FileStoreError::Read {
                    pos,
                    len: size,
                    source,
                })
            }
        }
    }

    /// The byte at `pos` as stored in the file, ignoring the journal.
    ///
    /// Loads the covering page on a miss (possibly evicting others) and
    /// returns `None` past the end of the file or of the session window.
    pub fn read_raw(&mut self, pos: FilePosition) -> FileStoreResult<Option<Byte>> {
        if let Some(end) = self.config.end_position {
            if self.absolute(pos) >= end {
                return Ok(None);
            }
        }

        let id = match self.find_chunk(pos) {
            Some(id) => id,
            None => {
                let start = self.aligned_chunk_start(pos);
                let id = self.load_chunk(start, self.config.chunk_size)?;
                debug_assert!(self.chunks.get(&id).is_some_and(|chunk| chunk.covers(pos)));

                // The fresh chunk is what the caller is about to read;
                // evicting it in the same breath would thrash.
                self.cleanup_chunks(&[id]);
                id
            }
        };

        let Some(chunk) = self.chunks.get_mut(&id) else {
            debug_assert!(false, "resident chunk {id} vanished");
            return Ok(None);
        };

        chunk.touch(1);

        // A position can fall inside the declared range yet past the actual
        // data: this page sits on the end of the file.
        let offset = (pos - chunk.start) as usize;
        Ok(chunk.data.get(offset).copied())
    }

    /// The byte at `pos` through the journal overlay, falling back to the
    /// file.
    pub fn read(&mut self, pos: FilePosition) -> FileStoreResult<Option<Byte>> {
        if let Some(byte) = self.journal.read(pos) {
            return Ok(Some(byte));
        }
        self.read_raw(pos)
    }

    /// `len` independent [`Self::read`]s starting at `pos`.
    pub fn read_multiple(
        &mut self,
        pos: FilePosition,
        len: usize,
    ) -> FileStoreResult<Vec<Option<Byte>>> {
        (0..len as FilePosition).map(|i| self.read(pos + i)).collect()
    }

    /// `len` independent [`Self::read_raw`]s starting at `pos`.
    pub fn read_multiple_raw(
        &mut self,
        pos: FilePosition,
        len: usize,
    ) -> FileStoreResult<Vec<Option<Byte>>> {
        (0..len as FilePosition)
            .map(|i| self.read_raw(pos + i))
            .collect()
    }

    /// Overlay reads until the first absent byte, returning the concrete
    /// prefix. Bulk reads that are expected to run into EOF use this.
    pub fn read_multiple_cutoff(
        &mut self,
        pos: FilePosition,
        len: usize,
    ) -> FileStoreResult<Vec<Byte>> {
        let mut bytes = Vec::with_capacity(len);

        for i in 0..len as FilePosition {
            match self.read(pos + i)? {
                Some(byte) => bytes.push(byte),
                None => break,
            }
        }

        Ok(bytes)
    }
}

// ---
