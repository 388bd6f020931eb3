//! Concrete scenarios exercising the engine end to end through its public
//! API: a host repository's `ExportStack` in, an edited `CommitStackState`
//! out, and the minimal `ImportStack` back.

use commit_stack_edit::config::Config;
use commit_stack_edit::edits::drop;
use commit_stack_edit::edits::fold;
use commit_stack_edit::edits::reorder;
use commit_stack_edit::export::calculate_import_stack;
use commit_stack_edit::export::ExportOptions;
use commit_stack_edit::rev::Rev;
use commit_stack_edit::testutils::StackBuilder;
use commit_stack_edit::wire::ImportAction;

#[test]
fn linear_add_then_fold_materializes_final_content() {
    let export = StackBuilder::new()
        .commit("A")
        .file("x.txt", "hello")
        .commit("B")
        .file("x.txt", "hello world")
        .build();
    let state = commit_stack_edit::CommitStackState::from_export(&export, Config::default()).unwrap();
    assert_eq!(
        state.describe_file_stacks(),
        "0:./x.txt 1:0/x.txt(hello) 2:1/x.txt(hello world)"
    );
    assert!(fold::can_fold_down(&state, Rev::new(1)));
    let folded = fold::fold_down(&state, Rev::new(1)).unwrap();
    assert_eq!(folded.rev_count(), 1);
    assert_eq!(
        folded
            .get_file(Rev::new(0), &"x.txt".into())
            .unwrap()
            .data
            .as_text(),
        Some("hello world")
    );
}

#[test]
fn rename_keeps_source_commit_undroppable() {
    let export = StackBuilder::new()
        .commit("A")
        .file("x.txt", "33")
        .commit("B")
        .rename("x.txt", "y.txt", "33")
        .build();
    let state = commit_stack_edit::CommitStackState::from_export(&export, Config::default()).unwrap();
    assert_eq!(
        state.describe_file_stacks(),
        "0:./x.txt 1:0/x.txt(33) 2:1/y.txt(33)"
    );
    assert!(!drop::can_drop(&state, Rev::new(0)));
}

#[test]
fn drop_middle_keeps_descendant_content() {
    let export = StackBuilder::new()
        .commit("root")
        .file("z.txt", "11")
        .commit("A")
        .file("z.txt", "22")
        .commit("B")
        .file("z.txt", "33")
        .build();
    let state = commit_stack_edit::CommitStackState::from_export(&export, Config::default()).unwrap();
    assert!(drop::can_drop(&state, Rev::new(1)));
    let dropped = drop::drop(&state, Rev::new(1)).unwrap();
    assert_eq!(dropped.rev_count(), 2);
    assert_eq!(
        dropped
            .get_file(Rev::new(1), &"z.txt".into())
            .unwrap()
            .data
            .as_text(),
        Some("33")
    );
}

#[test]
fn dependent_commits_cannot_swap() {
    let export = StackBuilder::new()
        .commit("A")
        .file("x.txt", "1\n")
        .commit("B")
        .file("x.txt", "1\n2\n")
        .build();
    let state = commit_stack_edit::CommitStackState::from_export(&export, Config::default()).unwrap();
    assert!(!reorder::can_move_up(&state, Rev::new(1)));
    assert!(!reorder::can_reorder(&state, &[Rev::new(1), Rev::new(0)]));
}

#[test]
fn goto_follows_renamed_top_commit_after_fold() {
    let export = StackBuilder::new()
        .commit("A")
        .file("x.txt", "hello")
        .commit("B")
        .file("x.txt", "hello world")
        .build();
    let original_top = export.last().unwrap().node.clone();
    let state = commit_stack_edit::CommitStackState::from_export(&export, Config::default()).unwrap();
    let folded = fold::fold_down(&state, Rev::new(1)).unwrap();
    let options = ExportOptions {
        goto: Some(original_top),
        preserve_dirty_files: false,
    };
    let actions = calculate_import_stack(&folded, &export, &options).unwrap();
    assert!(actions
        .iter()
        .any(|a| matches!(a, ImportAction::Goto { mark } if mark == ":r0")));
}

#[test]
fn no_op_edit_yields_empty_import_stack() {
    let export = StackBuilder::new()
        .commit("A")
        .file("x.txt", "hello")
        .commit("B")
        .file("x.txt", "hello world")
        .build();
    let state = commit_stack_edit::CommitStackState::from_export(&export, Config::default())
        .unwrap()
        .use_file_stack()
        .use_file_content();
    let actions = calculate_import_stack(&state, &export, &ExportOptions::default()).unwrap();
    assert!(actions.is_empty());
}
