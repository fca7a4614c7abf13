//! Reconciliation of local and remote note lists.

use std::collections::BTreeMap;

use crate::models::{Note, NoteId};

/// Merge two note lists keyed by id.
///
/// The remote side wins when both carry an id; notes present on one side
/// only are kept. The result is sorted by id with every id appearing once.
pub fn merge(local: Vec<Note>, remote: Vec<Note>) -> Vec<Note> {
    let mut combined = BTreeMap::<NoteId, Note>::new();
    for note in local {
        combined.entry(note.id).or_insert(note);
    }
    for note in remote {
        combined.insert(note.id, note);
    }
    combined.into_values().collect()
}

/// Summary of what a merge changed relative to the local list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Ids only the remote side had
    pub added: usize,
    /// Ids both sides had with differing content
    pub replaced: usize,
    /// Ids both sides had with identical content
    pub unchanged: usize,
    /// Ids only the local side had
    pub local_only: usize,
}

impl MergeReport {
    pub fn between(local: &[Note], merged: &[Note]) -> Self {
        let local_by_id = local
            .iter()
            .map(|note| (note.id, note))
            .collect::<BTreeMap<_, _>>();

        let mut report = Self::default();
        for note in merged {
            match local_by_id.get(&note.id) {
                None => report.added += 1,
                Some(existing) if *existing == note => report.unchanged += 1,
                Some(_) => report.replaced += 1,
            }
        }
        report.local_only = local_by_id.len().saturating_sub(report.replaced + report.unchanged);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteDraft;
    use pretty_assertions::assert_eq;

    fn note(id: u64, title: &str) -> Note {
        Note::from_draft(NoteId::new(id), NoteDraft::new(title, 1.0))
    }

    #[test]
    fn remote_wins_on_conflict() {
        let merged = merge(vec![note(1, "local")], vec![note(1, "remote")]);
        assert_eq!(merged, vec![note(1, "remote")]);
    }

    #[test]
    fn union_sorted_by_id() {
        let merged = merge(
            vec![note(5, "five"), note(1, "one")],
            vec![note(3, "three"), note(1, "uno")],
        );
        let titles = merged.iter().map(|n| n.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["uno", "three", "five"]);
    }

    #[test]
    fn empty_sides() {
        assert!(merge(Vec::new(), Vec::new()).is_empty());
        assert_eq!(merge(vec![note(2, "a")], Vec::new()), vec![note(2, "a")]);
        assert_eq!(merge(Vec::new(), vec![note(2, "b")]), vec![note(2, "b")]);
    }

    #[test]
    fn duplicate_local_ids_collapse() {
        let merged = merge(vec![note(1, "first"), note(1, "second")], Vec::new());
        assert_eq!(merged, vec![note(1, "first")]);
    }

    #[test]
    fn report_counts_changes() {
        let local = vec![note(1, "same"), note(2, "old"), note(4, "mine")];
        let remote = vec![note(1, "same"), note(2, "new"), note(3, "theirs")];
        let merged = merge(local.clone(), remote);

        assert_eq!(
            MergeReport::between(&local, &merged),
            MergeReport {
                added: 1,
                replaced: 1,
                unchanged: 1,
                local_only: 1,
            }
        );
    }
}
