use similar_asserts::assert_eq;

use hexed_journal::{EditEntry, EditJournal};

// ---

#[test]
fn undo_redo_linearity() {
    let mut journal = EditJournal::new();

    journal.edit(0, 4);
    assert_eq!(journal.read(0), Some(4));
    assert_eq!(journal.past_entry_count(), 1);
    assert_eq!(journal.future_entry_count(), 0);
    assert_eq!(journal.bytes_written(), 1);
    assert_eq!(journal.bytes_written_alltime(), 1);

    journal.edit(0, 9);
    assert_eq!(journal.read(0), Some(9));
    assert_eq!(journal.past_entry_count(), 2);
    assert_eq!(journal.future_entry_count(), 0);
    assert_eq!(journal.bytes_written(), 2);
    assert_eq!(journal.bytes_written_alltime(), 2);

    journal.edit(2, 6);
    assert_eq!(journal.read(0), Some(9));
    assert_eq!(journal.read(1), None);
    assert_eq!(journal.read(2), Some(6));
    assert_eq!(journal.past_entry_count(), 3);
    assert_eq!(journal.future_entry_count(), 0);

    assert_eq!(journal.undo(), Some(EditEntry { pos: 2, data: vec![6] }));
    assert_eq!(journal.read(2), None);
    assert_eq!(journal.past_entry_count(), 2);
    assert_eq!(journal.future_entry_count(), 1);
    assert_eq!(journal.bytes_written(), 2);
    assert_eq!(journal.bytes_written_alltime(), 3);

    assert_eq!(journal.undo(), Some(EditEntry { pos: 0, data: vec![9] }));
    assert_eq!(journal.read(0), Some(4));
    assert_eq!(journal.past_entry_count(), 1);
    assert_eq!(journal.future_entry_count(), 2);
    assert_eq!(journal.bytes_written(), 1);

    assert_eq!(journal.undo(), Some(EditEntry { pos: 0, data: vec![4] }));
    assert_eq!(journal.read(0), None);
    assert_eq!(journal.past_entry_count(), 0);
    assert_eq!(journal.future_entry_count(), 3);
    assert_eq!(journal.bytes_written(), 0);

    assert_eq!(journal.undo(), None);

    assert_eq!(journal.redo(), Some(EditEntry { pos: 0, data: vec![4] }));
    assert_eq!(journal.redo(), Some(EditEntry { pos: 0, data: vec![9] }));
    assert_eq!(journal.redo(), Some(EditEntry { pos: 2, data: vec![6] }));
    assert_eq!(journal.redo(), None);

    assert_eq!(journal.read(0), Some(9));
    assert_eq!(journal.read(2), Some(6));
    assert_eq!(journal.future_entry_count(), 0);
    assert_eq!(journal.bytes_written(), 3);
    assert_eq!(journal.bytes_written_alltime(), 3);
}

#[test]
fn new_edit_truncates_the_future() {
    // Fully undone journal of three entries…
    let mut journal = EditJournal::new();
    journal.edit(0, 4);
    journal.edit(0, 9);
    journal.edit(2, 6);
    journal.undo();
    journal.undo();
    journal.undo();
    assert_eq!(journal.past_entry_count(), 0);
    assert_eq!(journal.future_entry_count(), 3);

    // …and a fresh edit throws all three futures away.
    journal.edit(1, 9);
    assert_eq!(journal.past_entry_count(), 1);
    assert_eq!(journal.future_entry_count(), 0);
    assert_eq!(journal.bytes_written(), 1);
    assert_eq!(journal.bytes_written_alltime(), 4);
    assert_eq!(journal.redo(), None);
}

#[test]
fn bytes_filled_in_counts_distinct_positions() {
    let mut journal = EditJournal::new();
    journal.edit(0, 9);
    journal.edit(2, 6);
    assert_eq!(journal.bytes_filled_in(), 2);

    // Rewriting a covered position adds nothing.
    journal.edit(0, 9);
    assert_eq!(journal.bytes_filled_in(), 2);

    // A two-byte run covering 1 and 2 only adds position 1.
    journal.edit_multiple(1, vec![1, 2]);
    assert_eq!(journal.bytes_filled_in(), 3);

    // A run past everything adds all of its positions.
    journal.edit_multiple(3, vec![7, 8]);
    assert_eq!(journal.bytes_filled_in(), 5);

    // Undone entries stop counting.
    journal.undo();
    journal.undo();
    assert_eq!(journal.bytes_filled_in(), 2);
}

#[test]
fn undo_then_identical_edit_counts_twice_alltime() {
    let mut journal = EditJournal::new();
    journal.edit(7, 3);
    journal.undo();
    journal.edit(7, 3);

    assert_eq!(journal.bytes_written_alltime(), 2);
    assert_eq!(journal.bytes_written(), 1);
    assert_eq!(journal.entry_count(), 1);
}

#[test]
fn undo_redo_round_trips_exactly() {
    let mut journal = EditJournal::new();
    journal.edit_multiple(0, vec![1, 2, 3]);
    journal.edit(10, 4);
    journal.undo();

    let before = journal.clone();
    journal.undo();
    journal.redo();
    assert_eq!(journal, before);
}

#[test]
fn bytes_written_matches_active_entries() {
    let mut journal = EditJournal::new();
    journal.edit_multiple(0, vec![1, 2, 3]);
    journal.edit(9, 9);
    journal.edit_multiple(4, vec![5, 6]);
    journal.undo();
    journal.redo();
    journal.undo();

    let active: u64 = journal
        .active_entries()
        .iter()
        .map(|entry| entry.data.len() as u64)
        .sum();
    assert_eq!(journal.bytes_written(), active);
    assert_eq!(journal.bytes_written(), journal.bytes_stored_past());
}

#[test]
fn clear_preserving_stats_keeps_the_counters() {
    let mut journal = EditJournal::new();
    journal.edit_multiple(0, vec![1, 2, 3]);
    journal.edit(5, 4);
    journal.undo();

    journal.clear_preserving_stats();

    assert_eq!(journal.entry_count(), 0);
    assert!(!journal.can_undo());
    assert!(!journal.can_redo());
    assert_eq!(journal.bytes_written(), 3);
    assert_eq!(journal.bytes_written_alltime(), 4);

    journal.clear();
    assert_eq!(journal.bytes_written(), 0);
    assert_eq!(journal.bytes_written_alltime(), 0);
}

#[test]
fn stats_snapshot_is_consistent() {
    let mut journal = EditJournal::new();
    journal.edit_multiple(0, vec![1, 2, 3]);
    journal.edit(1, 4);
    journal.undo();

    let stats = journal.stats();
    assert_eq!(stats.num_entries, 2);
    assert_eq!(stats.num_past_entries, 1);
    assert_eq!(stats.num_future_entries, 1);
    assert_eq!(stats.bytes_stored_past, 3);
    assert_eq!(stats.bytes_stored_future, 1);
    assert_eq!(stats.bytes_stored_total(), 4);
    assert_eq!(stats.bytes_written, 3);
    assert_eq!(stats.bytes_written_alltime, 4);
    assert_eq!(stats.bytes_filled_in, 3);
}
