//! Property-based tests for tab lifecycle within one browser window.
//!
//! For any sequence of create/switch/close operations: tab IDs are
//! strictly increasing and never reused, and exactly one tab is selected
//! as long as the window has tabs.

use std::rc::Rc;

use proptest::prelude::*;
use webshell::managers::window_controller::{TabCloseOutcome, WindowController};
use webshell::surface::headless::HeadlessSurfaceFactory;

#[derive(Debug, Clone)]
enum TabOp {
    Create,
    Switch(usize),
    Close(usize),
}

fn arb_tab_ops() -> impl Strategy<Value = Vec<TabOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => Just(TabOp::Create),
            2 => (0..16usize).prop_map(TabOp::Switch),
            2 => (0..16usize).prop_map(TabOp::Close),
        ],
        1..40,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn tab_ids_monotonic_and_selection_exclusive(ops in arb_tab_ops()) {
        let factory = Rc::new(HeadlessSurfaceFactory::new());
        let mut window = WindowController::new_browser(1, None, factory);
        // The initial tab has ID 0.
        let mut highest_ever: u32 = 0;

        for op in &ops {
            match op {
                TabOp::Create => {
                    let id = window.create_tab(None).expect("browser windows grow tabs");
                    prop_assert!(
                        id > highest_ever,
                        "new tab ID {} not above highest ever {}",
                        id,
                        highest_ever
                    );
                    highest_ever = id;
                }
                TabOp::Switch(index) => {
                    let ids = window.tab_ids();
                    if !ids.is_empty() {
                        window.switch_tab(ids[index % ids.len()]);
                    }
                }
                TabOp::Close(index) => {
                    let ids = window.tab_ids();
                    if ids.is_empty() {
                        continue;
                    }
                    let victim = ids[index % ids.len()];
                    let was_selected = window.current_tab() == Some(victim);
                    let remaining_max = ids.iter().filter(|&&id| id != victim).max().copied();

                    match window.close_tab(victim) {
                        TabCloseOutcome::Closed => {
                            if was_selected {
                                // The survivor with the highest ID takes over.
                                prop_assert_eq!(window.current_tab(), remaining_max);
                            }
                        }
                        TabCloseOutcome::WindowEmpty => {
                            // The window would now close; stop driving it.
                            prop_assert_eq!(window.tab_len(), 0);
                            return Ok(());
                        }
                        TabCloseOutcome::NotFound => {
                            prop_assert!(false, "closed a listed tab but got NotFound");
                        }
                    }
                }
            }

            // Invariant: exactly one selected tab while tabs exist.
            let ids = window.tab_ids();
            if !ids.is_empty() {
                let selected: Vec<u32> = ids
                    .iter()
                    .filter(|&&id| window.tab(id).unwrap().is_selected())
                    .copied()
                    .collect();
                prop_assert_eq!(selected.len(), 1, "selected set {:?}", selected);
                prop_assert_eq!(window.current_tab(), Some(selected[0]));
            }
        }
    }

    #[test]
    fn closed_tab_ids_never_reappear(creates in 1usize..10, closes in 1usize..10) {
        let factory = Rc::new(HeadlessSurfaceFactory::new());
        let mut window = WindowController::new_browser(1, None, factory);

        for _ in 0..creates {
            window.create_tab(None);
        }
        let mut retired = Vec::new();
        for _ in 0..closes.min(window.tab_len().saturating_sub(1)) {
            let id = *window.tab_ids().last().unwrap();
            window.close_tab(id);
            retired.push(id);
        }

        let reborn = window.create_tab(None).unwrap();
        prop_assert!(!retired.contains(&reborn));
        prop_assert!(reborn > *retired.iter().max().unwrap_or(&0));
    }
}
