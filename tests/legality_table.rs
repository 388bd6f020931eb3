//! Table-driven coverage of the fold/drop/reorder legality predicates
//! across a handful of representative stacks.

use commit_stack_edit::config::Config;
use commit_stack_edit::edits::drop::can_drop;
use commit_stack_edit::edits::fold::can_fold_down;
use commit_stack_edit::edits::reorder::can_move_up;
use commit_stack_edit::rev::Rev;
use commit_stack_edit::testutils::StackBuilder;
use commit_stack_edit::CommitStackState;
use test_case::test_case;

fn linear_three() -> CommitStackState {
    let export = StackBuilder::new()
        .commit("A")
        .file("x.txt", "1\n")
        .commit("B")
        .file("x.txt", "1\n2\n")
        .commit("C")
        .file("x.txt", "1\n2\n3\n")
        .build();
    CommitStackState::from_export(&export, Config::default()).unwrap()
}

#[test_case(0, false; "root cannot be folded")]
#[test_case(1, true; "middle commit can be folded into its sole parent")]
#[test_case(2, true; "tip commit can be folded into its parent")]
fn fold_legality_over_linear_chain(rev: i64, expected: bool) {
    let state = linear_three();
    assert_eq!(can_fold_down(&state, Rev::new(rev)), expected);
}

#[test_case(0, false; "dropping A strands B and C's content dependency")]
#[test_case(1, false; "dropping B strands C's content dependency")]
#[test_case(2, true; "dropping the tip has no dependents")]
fn drop_legality_over_linear_chain(rev: i64, expected: bool) {
    let state = linear_three();
    assert_eq!(can_drop(&state, Rev::new(rev)), expected);
}

#[test_case(0, false; "root has no earlier position to move into")]
#[test_case(1, false; "B depends on A's content and cannot move before it")]
#[test_case(2, false; "C depends on B's content and cannot move before it")]
fn move_up_legality_over_linear_chain(rev: i64, expected: bool) {
    let state = linear_three();
    assert_eq!(can_move_up(&state, Rev::new(rev)), expected);
}

#[test]
fn immutable_commit_is_neither_foldable_nor_droppable() {
    let export = StackBuilder::new()
        .commit("A")
        .file("x.txt", "1")
        .immutable()
        .commit("B")
        .file("x.txt", "12")
        .build();
    let state = CommitStackState::from_export(&export, Config::default()).unwrap();
    assert!(!can_fold_down(&state, Rev::new(1)));
    assert!(!can_drop(&state, Rev::new(0)));
}
