//! Property: triage partitions are always disjoint and exhaustive.

use bugbash::model::records::BugBashItemRecord;
use bugbash::query::triage_partitions;
use proptest::prelude::*;

fn arbitrary_item() -> impl Strategy<Value = BugBashItemRecord> {
    (
        "[a-z0-9]{4,12}",
        0u32..5,
        any::<bool>(),
        proptest::option::of("[a-z ]{0,20}"),
    )
        .prop_map(|(id, work_item_id, rejected, reject_reason)| BugBashItemRecord {
            id,
            bug_bash_id: "bash1".to_string(),
            title: "generated".to_string(),
            team_id: "team1".to_string(),
            work_item_id,
            rejected,
            reject_reason,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn partitions_are_disjoint_and_cover_all_items(
        items in proptest::collection::vec(arbitrary_item(), 0..40)
    ) {
        let partitions = triage_partitions(&items);

        // Union is the full set.
        prop_assert_eq!(
            partitions.pending.len() + partitions.rejected.len() + partitions.accepted.len(),
            items.len()
        );

        // Each partition obeys its derivation rule, which also makes
        // the three mutually exclusive.
        for item in &partitions.accepted {
            prop_assert!(item.work_item_id > 0);
        }
        for item in &partitions.rejected {
            prop_assert!(item.work_item_id == 0 && item.rejected);
        }
        for item in &partitions.pending {
            prop_assert!(item.work_item_id == 0 && !item.rejected);
        }
    }
}
