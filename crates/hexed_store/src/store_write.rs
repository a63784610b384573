use std::io::{Seek as _, SeekFrom, Write as _};
use std::path::PathBuf;

use hexed_journal::{Buffer, Byte, EditEntry, FilePosition};

use crate::{FileStore, FileStoreError, FileStoreResult};

// ---

impl FileStore {
    /// Records a single-byte overwrite at `pos` in the journal.
    ///
    /// Neither the file nor the chunk cache is touched; only
    /// [`Self::save_history_destructive`] writes edits back.
    #[inline]
    pub fn edit(&mut self, pos: FilePosition, value: Byte) {
        self.journal.edit(pos, value);
    }

    /// Records an overwrite of `data.len()` bytes starting at `pos` in the
    /// journal. `data` must be non-empty.
    #[inline]
    pub fn edit_multiple(&mut self, pos: FilePosition, data: Buffer) {
        self.journal.edit_multiple(pos, data);
    }

    /// Steps the journal's history cursor back, returning the entry that is
    /// no longer active. The next read reflects the older state on its own.
    #[inline]
    pub fn undo(&mut self) -> Option<EditEntry> {
        self.journal.undo()
    }

    /// Steps the journal's history cursor forward, returning the entry that
    /// became active again.
    #[inline]
    pub fn redo(&mut self) -> Option<EditEntry> {
        self.journal.redo()
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.journal.can_undo()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.journal.can_redo()
    }

    /// Conservative dirty flag: any active edit counts as unsaved, even one
    /// identical to what a previous save already flushed.
    #[inline]
    pub fn has_unsaved_edits(&self) -> bool {
        self.can_undo()
    }

    /// Writes the journal into the file, then drops the journal (keeping its
    /// lifetime statistics) and every resident chunk.
    ///
    /// Entries are applied oldest-first in storage order, including entries
    /// beyond the history cursor, i.e. edits the user has undone still get
    /// flushed. A failed write surfaces immediately and leaves the file
    /// partially updated; keeping backups is the caller's job.
    ///
    /// No-op on sessions opened without `allow_writing`.
    pub fn save_history_destructive(&mut self) -> FileStoreResult<()> {
        if !self.config.allow_writing {
            log::warn!("destructive save requested on a read-only session; ignoring");
            return Ok(());
        }

        log::debug!(
            "saving {} journal entries into {:?}",
            self.journal.entry_count(),
            self.path,
        );

        for entry in self.journal.entries() {
            let pos = self.config.start_position + entry.pos;

            self.file
                .seek(SeekFrom::Start(pos))
                .map_err(|source| FileStoreError::Seek { pos, source })?;

            self.file
                .write_all(&entry.data)
                .map_err(|source| FileStoreError::Write {
                    pos,
                    len: entry.data.len() as u64,
                    source,
                })?;
        }

        self.invalidate_chunks();
        self.journal.clear_preserving_stats();

        Ok(())
    }

    /// Copies the current file to `new_path`, swaps the session over to the
    /// copy, and runs [`Self::save_history_destructive`] on it. The original
    /// file is left untouched.
    ///
    /// An existing `new_path` is overwritten. Saving to the copy is the
    /// whole point, so the session becomes writable regardless of how it was
    /// opened, and stays writable afterwards.
    pub fn save_as_history_destructive(
        &mut self,
        new_path: impl Into<PathBuf>,
    ) -> FileStoreResult<()> {
        let new_path = new_path.into();

        std::fs::copy(&self.path, &new_path).map_err(|source| FileStoreError::Copy {
            from: self.path.clone(),
            to: new_path.clone(),
            source,
        })?;

        log::debug!("swapping session from {:?} to {new_path:?}", self.path);

        // Dropping the old handle closes the original file.
        self.config.allow_writing = true;
        self.file = Self::open_file(&new_path, true)?;
        self.path = new_path;

        self.save_history_destructive()
    }
}
