//! Snapshot coverage of `describe_file_stacks()`, the engine's debug
//! rendering of the dual index and file-stack contents.

use commit_stack_edit::config::Config;
use commit_stack_edit::edits::drop;
use commit_stack_edit::edits::fold;
use commit_stack_edit::rev::Rev;
use commit_stack_edit::testutils::StackBuilder;
use commit_stack_edit::CommitStackState;

#[test]
fn linear_stack_over_one_path() {
    let export = StackBuilder::new()
        .commit("A")
        .file("x.txt", "hello")
        .commit("B")
        .file("x.txt", "hello world")
        .build();
    let state = CommitStackState::from_export(&export, Config::default()).unwrap();
    insta::assert_snapshot!(state.describe_file_stacks(), @"0:./x.txt 1:0/x.txt(hello) 2:1/x.txt(hello world)");
}

#[test]
fn rename_shares_one_file_stack_across_two_paths() {
    let export = StackBuilder::new()
        .commit("A")
        .file("x.txt", "33")
        .commit("B")
        .rename("x.txt", "y.txt", "33")
        .build();
    let state = CommitStackState::from_export(&export, Config::default()).unwrap();
    insta::assert_snapshot!(state.describe_file_stacks(), @"0:./x.txt 1:0/x.txt(33) 2:1/y.txt(33)");
}

#[test]
fn folding_the_tip_collapses_its_file_stack_entry() {
    let export = StackBuilder::new()
        .commit("A")
        .file("x.txt", "hello")
        .commit("B")
        .file("x.txt", "hello world")
        .build();
    let state = CommitStackState::from_export(&export, Config::default()).unwrap();
    let folded = fold::fold_down(&state, Rev::new(1)).unwrap();
    insta::assert_snapshot!(folded.describe_file_stacks(), @"0:./x.txt 1:0/x.txt(hello world)");
}

#[test]
fn dropping_the_middle_renumbers_the_surviving_commit() {
    let export = StackBuilder::new()
        .commit("root")
        .file("z.txt", "11")
        .commit("A")
        .file("z.txt", "22")
        .commit("B")
        .file("z.txt", "33")
        .build();
    let state = CommitStackState::from_export(&export, Config::default()).unwrap();
    let dropped = drop::drop(&state, Rev::new(1)).unwrap();
    insta::assert_snapshot!(dropped.describe_file_stacks(), @"0:./z.txt 1:0/z.txt(11) 2:1/z.txt(33)");
}
