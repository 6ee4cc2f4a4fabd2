use doodlepad::history::{HistoryManager, Snapshot};
use image::{Rgba, RgbaImage};
use proptest::prelude::*;

fn solid(value: u8) -> Snapshot {
    Snapshot::capture(&RgbaImage::from_pixel(3, 3, Rgba([value, 0, 0, 255])))
}

#[derive(Debug, Clone)]
enum Op {
    Commit(u8),
    Undo,
    Redo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::Commit),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

proptest! {
    #[test]
    fn undo_then_redo_returns_to_latest(values in prop::collection::vec(1u8..=255, 1..20), steps in 0usize..25) {
        let mut history = HistoryManager::new();
        history.reset_to(solid(0));
        for value in &values {
            history.commit(solid(*value));
        }
        let latest = history.current().cloned();

        let mut undone = 0;
        for _ in 0..steps {
            if history.undo().is_some() {
                undone += 1;
            }
        }
        for _ in 0..undone {
            prop_assert!(history.redo().is_some());
        }
        prop_assert_eq!(history.current().cloned(), latest);
        prop_assert!(!history.can_redo());
    }

    #[test]
    fn history_never_loses_initial_entry(ops in prop::collection::vec(op(), 0..60)) {
        let mut history = HistoryManager::new();
        history.reset_to(solid(0));
        for op in ops {
            match op {
                Op::Commit(value) => {
                    let top = history.current().cloned();
                    let pushed = history.commit(solid(value));
                    prop_assert_eq!(pushed, top != Some(solid(value)));
                    prop_assert!(!history.can_redo());
                }
                Op::Undo => {
                    let before = history.undo_len();
                    let moved = history.undo().is_some();
                    prop_assert_eq!(moved, before > 1);
                }
                Op::Redo => {
                    history.redo();
                }
            }
            prop_assert!(history.undo_len() >= 1);
        }
    }

    #[test]
    fn limit_bounds_undo_depth(limit in 1usize..8, commits in 0u8..40) {
        let mut history = HistoryManager::with_limit(Some(limit));
        history.reset_to(solid(0));
        for value in 1..=commits {
            history.commit(solid(value));
            prop_assert!(history.undo_len() <= limit);
        }
    }
}
