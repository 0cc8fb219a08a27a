//! View-side filtering and triage partitioning.
//!
//! Stores keep only the raw cache; anything filtered or partitioned is
//! re-derived from it on every read. That keeps store logic trivial at
//! the cost of an O(n) pass per read, which is fine at bug-bash scale.

use crate::model::item::{TriageKind, TriageState};
use crate::model::records::BugBashItemRecord;

/// Items split into their mutually exclusive triage partitions.
///
/// For any input, the three partitions are disjoint and their union is
/// the input: accepted wins over the rejected flag, everything else is
/// pending.
#[derive(Debug, Default)]
pub struct Partitions<'a> {
    pub pending: Vec<&'a BugBashItemRecord>,
    pub rejected: Vec<&'a BugBashItemRecord>,
    pub accepted: Vec<&'a BugBashItemRecord>,
}

/// Partition items by derived triage state.
pub fn triage_partitions<'a, I>(items: I) -> Partitions<'a>
where
    I: IntoIterator<Item = &'a BugBashItemRecord>,
{
    let mut partitions = Partitions::default();
    for item in items {
        match TriageState::of(item).kind() {
            TriageKind::Pending => partitions.pending.push(item),
            TriageKind::Rejected => partitions.rejected.push(item),
            TriageKind::Accepted => partitions.accepted.push(item),
        }
    }
    partitions
}

/// Filter options for item list views.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub team_id: Option<String>,
    pub created_by: Option<String>,
    pub triage: Option<TriageKind>,
    /// Case-insensitive title substring.
    pub title_contains: Option<String>,
}

impl ItemFilter {
    #[must_use]
    pub fn matches(&self, item: &BugBashItemRecord) -> bool {
        if let Some(ref team_id) = self.team_id {
            if item.team_id != *team_id {
                return false;
            }
        }

        if let Some(ref created_by) = self.created_by {
            if item.created_by != *created_by {
                return false;
            }
        }

        if let Some(triage) = self.triage {
            if TriageState::of(item).kind() != triage {
                return false;
            }
        }

        if let Some(ref query) = self.title_contains {
            if !item.title.to_lowercase().contains(&query.to_lowercase()) {
                return false;
            }
        }

        true
    }

    /// Apply the filter to a slice of items.
    #[must_use]
    pub fn apply<'a>(&self, items: &[&'a BugBashItemRecord]) -> Vec<&'a BugBashItemRecord> {
        items
            .iter()
            .filter(|item| self.matches(item))
            .copied()
            .collect()
    }
}
