//! Property tests for the register invariants: id monotonicity/uniqueness,
//! the forced-Open creation status, snapshot isolation, and filter/export
//! shape under arbitrary appends.

use proptest::prelude::*;

use parapet_core::export::render_csv;
use parapet_core::{RiskDraft, RiskRegister, RiskStatus, Severity, filter};

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
    ]
}

fn arb_status() -> impl Strategy<Value = Option<RiskStatus>> {
    prop_oneof![
        Just(None),
        Just(Some(RiskStatus::Open)),
        Just(Some(RiskStatus::MitigationInProgress)),
        Just(Some(RiskStatus::Closed)),
    ]
}

prop_compose! {
    fn arb_draft()(
        asset in ".{0,24}",
        threat in ".{0,24}",
        vuln in ".{0,24}",
        impact in arb_severity(),
        likelihood in arb_severity(),
        status in arb_status(),
    ) -> RiskDraft {
        let mut draft = RiskDraft::new(asset, threat, vuln, impact, likelihood);
        draft.status = status;
        draft
    }
}

proptest! {
    #[test]
    fn ids_are_strictly_increasing_and_unique(drafts in prop::collection::vec(arb_draft(), 0..32)) {
        let mut reg = RiskRegister::seeded();
        let mut last_id = reg.snapshot().iter().map(|r| r.id).max().unwrap_or(0);
        for draft in drafts {
            let created = reg.append(draft);
            prop_assert!(created.id > last_id, "id {} not above {}", created.id, last_id);
            last_id = created.id;
        }
        let ids: Vec<u64> = reg.snapshot().iter().map(|r| r.id).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        prop_assert_eq!(ids, deduped);
    }

    #[test]
    fn created_status_is_always_open(draft in arb_draft()) {
        let mut reg = RiskRegister::seeded();
        let created = reg.append(draft);
        prop_assert_eq!(created.status, RiskStatus::Open);
    }

    #[test]
    fn snapshot_mutation_never_leaks_back(drafts in prop::collection::vec(arb_draft(), 0..8)) {
        let mut reg = RiskRegister::seeded();
        for draft in drafts {
            reg.append(draft);
        }
        let before = reg.snapshot();
        let mut tampered = reg.snapshot();
        tampered.clear();
        prop_assert_eq!(reg.snapshot(), before);
    }

    #[test]
    fn empty_filter_is_identity(drafts in prop::collection::vec(arb_draft(), 0..8)) {
        let mut reg = RiskRegister::seeded();
        for draft in drafts {
            reg.append(draft);
        }
        let snap = reg.snapshot();
        prop_assert_eq!(filter::apply(&snap, ""), snap);
    }

    #[test]
    fn csv_always_has_one_row_per_record(drafts in prop::collection::vec(arb_draft(), 1..16)) {
        let mut reg = RiskRegister::new();
        for draft in drafts {
            reg.append(draft);
        }
        let snap = reg.snapshot();
        let csv = render_csv(&snap).expect("non-empty register renders");
        prop_assert_eq!(csv.lines().count(), snap.len() + 1);
    }
}
