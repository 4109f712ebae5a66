//! Property-based tests for the reservation state machine and visit windows.

use super::{ReservationStatus, VisitWindow};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = ReservationStatus> {
    prop::sample::select(ReservationStatus::ALL.to_vec())
}

fn window_strategy() -> impl Strategy<Value = VisitWindow> {
    (0i64..24 * 60, 1u32..=360).prop_map(|(offset, minutes)| {
        let base = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        VisitWindow::starting_at(base + Duration::minutes(offset), minutes).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 5000,
        max_shrink_iters: 5000,
        .. ProptestConfig::default()
    })]

    // Terminal statuses never move again
    #[test]
    fn terminal_is_final(from in status_strategy(), to in status_strategy()) {
        if from.is_terminal() {
            prop_assert!(!from.can_transition_to(to));
            prop_assert!(from.transition_to(to).is_err());
        }
    }

    // No status transitions to itself
    #[test]
    fn no_self_transition(status in status_strategy()) {
        prop_assert!(!status.can_transition_to(status));
    }

    // transition_to agrees with can_transition_to
    #[test]
    fn transition_to_matches_table(from in status_strategy(), to in status_strategy()) {
        prop_assert_eq!(from.transition_to(to).is_ok(), from.can_transition_to(to));
    }

    // Walking any accepted path reaches a terminal status in at most three steps
    #[test]
    fn lifecycle_paths_are_short(choices in prop::collection::vec(0usize..6, 0..10)) {
        let mut status = ReservationStatus::Pending;
        let mut steps = 0;
        for choice in choices {
            let next = ReservationStatus::ALL[choice];
            if status.can_transition_to(next) {
                status = next;
                steps += 1;
            }
        }
        prop_assert!(steps <= 3);
    }

    // Overlap is symmetric and reflexive
    #[test]
    fn overlap_symmetric(a in window_strategy(), b in window_strategy(), buffer in 0i64..60) {
        let buffer = Duration::minutes(buffer);
        prop_assert_eq!(a.overlaps(&b, buffer), b.overlaps(&a, buffer));
        prop_assert!(a.overlaps(&a, buffer));
    }

    // A larger turnover buffer never removes an overlap
    #[test]
    fn overlap_monotonic_in_buffer(a in window_strategy(), b in window_strategy(), small in 0i64..30, extra in 0i64..30) {
        if a.overlaps(&b, Duration::minutes(small)) {
            prop_assert!(a.overlaps(&b, Duration::minutes(small + extra)));
        }
    }
}
