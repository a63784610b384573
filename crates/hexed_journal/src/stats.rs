use ahash::HashSet;

use crate::{EditJournal, FilePosition};

// ---

/// Snapshot of an [`EditJournal`]'s bookkeeping counters.
///
/// Everything in here is derivable from the journal; computing a snapshot is
/// O(entries) except [`Self::bytes_filled_in`], which is O(entries · bytes).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalStats {
    /// Recorded entries, past and future.
    pub num_entries: u64,

    /// Active entries (below the history cursor).
    pub num_past_entries: u64,

    /// Redoable entries (at or above the history cursor).
    pub num_future_entries: u64,

    /// Bytes held by active entries.
    pub bytes_stored_past: u64,

    /// Bytes held by redoable entries.
    pub bytes_stored_future: u64,

    /// Bytes covered by the currently-active entries.
    pub bytes_written: u64,

    /// Bytes recorded over the journal's whole lifetime, undone or not.
    pub bytes_written_alltime: u64,

    /// Distinct positions currently overridden by the journal. Two writes to
    /// the same position count once.
    pub bytes_filled_in: u64,
}

impl JournalStats {
    /// Bytes held by all recorded entries, past and future.
    #[inline]
    pub fn bytes_stored_total(&self) -> u64 {
        self.bytes_stored_past + self.bytes_stored_future
    }
}

impl std::fmt::Display for JournalStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            num_entries,
            num_past_entries,
            num_future_entries,
            bytes_stored_past,
            bytes_stored_future,
            bytes_written,
            bytes_written_alltime,
            bytes_filled_in,
        } = *self;

        writeln!(f, "entries: {num_entries} ({num_past_entries} past, {num_future_entries} future)")?;
        writeln!(
            f,
            "bytes stored: {} ({bytes_stored_past} past, {bytes_stored_future} future)",
            self.bytes_stored_total(),
        )?;
        writeln!(f, "bytes written: {bytes_written} ({bytes_written_alltime} all-time)")?;
        writeln!(f, "bytes filled in: {bytes_filled_in}")?;

        Ok(())
    }
}

// ---

impl EditJournal {
    /// Recorded entry count, past and future.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries().len()
    }

    /// Active entry count.
    #[inline]
    pub fn past_entry_count(&self) -> usize {
        self.cursor()
    }

    /// Redoable entry count.
    #[inline]
    pub fn future_entry_count(&self) -> usize {
        self.entry_count() - self.cursor()
    }

    /// Bytes held by all recorded entries, past and future.
    ///
    /// Not the same as [`Self::bytes_written_alltime`]: cleared entries no
    /// longer count here.
    pub fn bytes_stored(&self) -> u64 {
        self.entries().iter().map(|entry| entry.data.len() as u64).sum()
    }

    /// Bytes held by the active entries.
    pub fn bytes_stored_past(&self) -> u64 {
        self.active_entries()
            .iter()
            .map(|entry| entry.data.len() as u64)
            .sum()
    }

    /// Bytes held by the redoable entries.
    pub fn bytes_stored_future(&self) -> u64 {
        self.entries()[self.cursor()..]
            .iter()
            .map(|entry| entry.data.len() as u64)
            .sum()
    }

    /// Distinct positions currently overridden by the active entries.
    pub fn bytes_filled_in(&self) -> u64 {
        let mut filled: HashSet<FilePosition> = HashSet::default();
        for entry in self.active_entries() {
            filled.extend(entry.range());
        }
        filled.len() as u64
    }

    /// Computes a full snapshot of the journal's counters.
    pub fn stats(&self) -> JournalStats {
        JournalStats {
            num_entries: self.entry_count() as u64,
            num_past_entries: self.past_entry_count() as u64,
            num_future_entries: self.future_entry_count() as u64,
            bytes_stored_past: self.bytes_stored_past(),
            bytes_stored_future: self.bytes_stored_future(),
            bytes_written: self.bytes_written(),
            bytes_written_alltime: self.bytes_written_alltime(),
            bytes_filled_in: self.bytes_filled_in(),
        }
    }
}
