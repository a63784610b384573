use crate::{Buffer, Byte, FilePosition};

// ---

/// A single recorded write: the bytes of `data`, starting at `pos`.
///
/// An entry asserts that, at its point in history, positions
/// `pos .. pos + data.len()` hold the bytes of `data`. Entries are immutable
/// once recorded; `data` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEntry {
    pub pos: FilePosition,
    pub data: Buffer,
}

impl EditEntry {
    /// The session-relative positions this entry overrides.
    #[inline]
    pub fn range(&self) -> std::ops::Range<FilePosition> {
        self.pos..self.pos + self.data.len() as FilePosition
    }

    #[inline]
    pub(crate) fn covers(&self, pos: FilePosition) -> bool {
        self.range().contains(&pos)
    }
}

/// An ordered, append-only log of positioned writes, with a cursor into its
/// own history.
///
/// ## History model
///
/// Entries are stored oldest-first. The cursor splits them into the active
/// *past* (`[0, cursor)`) and the redoable *future* (`[cursor, len)`):
///
/// * [`Self::undo`] moves the cursor one entry back; nothing is discarded.
/// * [`Self::redo`] moves it one entry forward.
/// * Recording an edit while the cursor is below the end rewrites history:
///   the future is truncated, the new entry appended, and the cursor returns
///   to the end.
///
/// This replaces the classic two-stack undo/redo with a single list and an
/// index, giving O(1) undo/redo and cheap state queries at the cost of an
/// O(active entries) reverse scan per [`Self::read`], which is fine for
/// interactive editing workloads where the journal stays small.
///
/// The journal knows nothing about the underlying file: positions are not
/// bounds-checked and edits never touch disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditJournal {
    /// All recorded entries, oldest first.
    entries: Vec<EditEntry>,

    /// Index one past the newest *active* entry; `None` means "at the end",
    /// i.e. every entry is active.
    cursor: Option<usize>,

    /// Oldest reachable undo point. Stays 0 for now; reserved for compaction
    /// operations that would make undoing into the compacted range
    /// incoherent.
    limit: usize,

    /// Bytes covered by the currently-active entries. Shrinks on undo, grows
    /// on edit and redo.
    bytes_written: u64,

    /// Bytes recorded over the journal's whole lifetime. Never decreases on
    /// undo, redo or [`Self::clear_preserving_stats`].
    bytes_written_alltime: u64,
}

impl EditJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one past the newest active entry.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor.unwrap_or(self.entries.len())
    }

    /// Oldest entry index that [`Self::undo`] may step back to.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// All recorded entries, oldest first, including the redoable future.
    #[inline]
    pub fn entries(&self) -> &[EditEntry] {
        &self.entries
    }

    /// Bytes covered by the currently-active entries.
    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Bytes recorded over the journal's whole lifetime, undone or not.
    #[inline]
    pub fn bytes_written_alltime(&self) -> u64 {
        self.bytes_written_alltime
    }

    /// The active entries, oldest first.
    #[inline]
    pub fn active_entries(&self) -> &[EditEntry] {
        &self.entries[..self.cursor()]
    }

    // --- Editing ---

    /// Records a single-byte overwrite at `pos`.
    pub fn edit(&mut self, pos: FilePosition, value: Byte) {
        self.edit_multiple(pos, vec![value]);
    }

    /// Records an overwrite of `data.len()` bytes starting at `pos`
    /// (`data[0]` lands on `pos`, `data[i]` on `pos + i`).
    ///
    /// If the cursor sits below the end of history, the redoable future is
    /// discarded first. `data` must be non-empty.
    pub fn edit_multiple(&mut self, pos: FilePosition, data: Buffer) {
        debug_assert!(!data.is_empty(), "edit data must be non-empty");
        debug_assert!(self.limit <= self.cursor());

        if let Some(cursor) = self.cursor.take() {
            self.entries.truncate(cursor);
        }

        let num_bytes = data.len() as u64;
        self.entries.push(EditEntry { pos, data });
        self.bytes_written += num_bytes;
        self.bytes_written_alltime += num_bytes;
    }

    // --- Reading ---

    /// Newest-wins overlay lookup: the byte at `pos` according to the active
    /// entries, or `None` if no active entry covers it.
    pub fn read(&self, pos: FilePosition) -> Option<Byte> {
        self.active_entries()
            .iter()
            .rev()
            .find(|entry| entry.covers(pos))
            .map(|entry| entry.data[(pos - entry.pos) as usize])
    }

    /// Like [`Self::read`], but only matches entries that assigned exactly
    /// one byte at exactly `pos`.
    pub fn read_single_assignment(&self, pos: FilePosition) -> Option<Byte> {
        self.active_entries()
            .iter()
            .rev()
            .find(|entry| entry.pos == pos && entry.data.len() == 1)
            .map(|entry| entry.data[0])
    }

    /// `len` independent [`Self::read`]s starting at `pos`.
    pub fn read_multiple(&self, pos: FilePosition, len: usize) -> Vec<Option<Byte>> {
        (0..len as FilePosition).map(|i| self.read(pos + i)).collect()
    }

    // --- Undo / Redo ---

    /// Steps the cursor one entry back, returning the entry that is no
    /// longer active, or `None` at the bottom of reachable history.
    ///
    /// The entry stays recorded: [`Self::redo`] brings it back.
    pub fn undo(&mut self) -> Option<EditEntry> {
        if !self.can_undo() {
            return None;
        }

        let cursor = self.cursor() - 1;
        self.cursor = Some(cursor);

        let entry = self.entries[cursor].clone();
        self.bytes_written -= entry.data.len() as u64;
        Some(entry)
    }

    /// Steps the cursor one entry forward, returning the entry that became
    /// active again, or `None` if there is no future.
    pub fn redo(&mut self) -> Option<EditEntry> {
        if !self.can_redo() {
            return None;
        }

        let cursor = self.cursor();
        self.cursor = if cursor + 1 == self.entries.len() {
            None
        } else {
            Some(cursor + 1)
        };

        let entry = self.entries[cursor].clone();
        self.bytes_written += entry.data.len() as u64;
        Some(entry)
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.cursor() > self.limit
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.cursor() < self.entries.len()
    }

    // --- Clearing ---

    /// Forgets all entries, all history and the lifetime statistics.
    pub fn clear(&mut self) {
        self.bytes_written = 0;
        self.bytes_written_alltime = 0;
        self.clear_preserving_stats();
    }

    /// Forgets all entries and all history, but keeps the byte counters.
    ///
    /// This is what a destructive save uses: the edits now live in the file,
    /// yet the session's lifetime statistics should survive.
    pub fn clear_preserving_stats(&mut self) {
        self.entries.clear();
        self.cursor = None;
        self.limit = 0;
    }
}

// ---

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn read_is_newest_wins() {
        let mut journal = EditJournal::new();
        journal.edit_multiple(4, vec![1, 2, 3]);
        journal.edit(5, 9);

        assert_eq!(journal.read(4), Some(1));
        assert_eq!(journal.read(5), Some(9));
        assert_eq!(journal.read(6), Some(3));
        assert_eq!(journal.read(7), None);
        assert_eq!(journal.read(3), None);
    }

    #[test]
    fn read_single_assignment_skips_multi_byte_entries() {
        let mut journal = EditJournal::new();
        journal.edit_multiple(0, vec![1, 2]);
        assert_eq!(journal.read(1), Some(2));
        assert_eq!(journal.read_single_assignment(1), None);

        journal.edit(1, 7);
        assert_eq!(journal.read_single_assignment(1), Some(7));

        // Covers position 1 but assigns at 0: not a single assignment of 1.
        journal.edit_multiple(0, vec![5, 6]);
        assert_eq!(journal.read(1), Some(6));
        assert_eq!(journal.read_single_assignment(1), Some(7));
    }

    #[test]
    fn read_multiple_of_zero_is_empty() {
        let mut journal = EditJournal::new();
        journal.edit(0, 1);
        assert_eq!(journal.read_multiple(0, 0), Vec::<Option<Byte>>::new());
    }

    #[test]
    fn undone_entries_are_invisible_to_reads() {
        let mut journal = EditJournal::new();
        journal.edit(0, 1);
        journal.edit(0, 2);

        assert_eq!(journal.read(0), Some(2));
        journal.undo();
        assert_eq!(journal.read(0), Some(1));
        journal.undo();
        assert_eq!(journal.read(0), None);
        journal.redo();
        assert_eq!(journal.read(0), Some(1));
    }

    #[test]
    fn edit_below_end_truncates_the_future() {
        let mut journal = EditJournal::new();
        journal.edit(0, 1);
        journal.edit(1, 2);
        journal.undo();

        journal.edit(2, 3);

        assert_eq!(journal.entries().len(), 2);
        assert_eq!(journal.cursor(), 2);
        assert!(!journal.can_redo());
        assert_eq!(journal.read(1), None);
        assert_eq!(journal.read(2), Some(3));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut journal = EditJournal::new();
        journal.edit_multiple(0, vec![1, 2, 3]);
        journal.clear();
        let once = journal.clone();
        journal.clear();
        assert_eq!(journal, once);
        assert_eq!(journal, EditJournal::new());
    }
}
