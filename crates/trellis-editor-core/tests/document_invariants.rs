// End-to-end checks of the document invariants: a hydrated draft is
// normalized once, stays stable under repeated normalization, and every
// structural edit leaves the tree legal and the change log coherent.

use pretty_assertions::assert_eq;
use trellis_ast::builder::{group, heading_with_id, paragraph, statement_with_id, text, ul};
use trellis_ast::{Element, GroupKind};
use trellis_editor_core::{
    BlockType, ChangeOp, Editor, Key, KeyEvent, Modifiers, NodeKind, PluginRegistry, Point,
    Selection, default_plugins,
};

fn editor_with(children: Vec<Element>) -> Editor {
    Editor::from_elements(&children, PluginRegistry::new(default_plugins()))
}

fn sample_document() -> Vec<Element> {
    vec![group(vec![
        heading_with_id(
            "h1",
            vec![
                Element::StaticParagraph {
                    children: vec![text("Title").into()],
                }
                .into(),
                group(vec![
                    statement_with_id("b1", vec![paragraph(vec![text("intro").into()]).into()])
                        .into(),
                ])
                .into(),
            ],
        )
        .into(),
        statement_with_id(
            "b2",
            vec![
                paragraph(vec![text("body").into()]).into(),
                ul(vec![
                    statement_with_id("b3", vec![paragraph(vec![text("nested").into()]).into()])
                        .into(),
                ])
                .into(),
            ],
        )
        .into(),
    ])]
}

fn assert_tree_legal(editor: &Editor) {
    let tree = editor.tree();
    for node in tree.descendants(tree.root()) {
        let kind = tree.kind(node);
        if kind.is_group() {
            assert!(tree.child_count(node) >= 1, "empty container survived");
        }
        if matches!(kind, NodeKind::Heading { .. }) {
            let first = tree.first_child(node).expect("heading has children");
            assert!(
                tree.kind(first).is_static_content(),
                "heading first child is {}",
                tree.kind(first).kind_name()
            );
        }
    }
}

#[test]
fn test_normalization_idempotent_on_sample() {
    let editor = editor_with(sample_document());
    assert_tree_legal(&editor);
    let once = editor.extract();
    let again = editor_with(once.children.clone()).extract();
    assert_eq!(once, again);
}

#[test]
fn test_tree_stays_legal_under_edits() {
    let mut editor = editor_with(sample_document());

    let b3 = editor.tree().block_by_id(&"b3".into()).unwrap();
    editor.promote_block(b3);
    assert_tree_legal(&editor);

    let b2 = editor.tree().block_by_id(&"b2".into()).unwrap();
    editor.set_type(b2, BlockType::Heading);
    assert_tree_legal(&editor);

    let b3 = editor.tree().block_by_id(&"b3".into()).unwrap();
    editor.demote_block(b3);
    assert_tree_legal(&editor);
}

#[test]
fn test_set_type_and_set_list_preserve_ids() {
    let mut editor = editor_with(sample_document());
    let b2 = editor.tree().block_by_id(&"b2".into()).unwrap();

    editor.set_type(b2, BlockType::Blockquote);
    let b2 = editor
        .tree()
        .block_by_id(&"b2".into())
        .expect("id survives retype");
    assert!(matches!(editor.tree().kind(b2), NodeKind::Blockquote { .. }));

    editor.set_list(b2, GroupKind::OrderedList { start: None });
    assert!(editor.tree().block_by_id(&"b2".into()).is_some());
    assert!(editor.tree().block_by_id(&"b3".into()).is_some());
}

#[test]
fn test_empty_group_hydration_yields_empty_document() {
    let editor = editor_with(vec![Element::Group {
        children: vec![text("").into()],
    }]);
    assert_eq!(editor.extract().children, vec![]);
}

#[test]
fn test_heading_swallows_block_in_title_slot() {
    let editor = editor_with(vec![group(vec![
        Element::Heading {
            id: "h1".into(),
            children: vec![
                statement_with_id("b1", vec![paragraph(vec![text("the title").into()]).into()])
                    .into(),
            ],
        }
        .into(),
    ])]);
    let h1 = editor.tree().block_by_id(&"h1".into()).unwrap();
    let first = editor.tree().first_child(h1).unwrap();
    assert!(editor.tree().kind(first).is_static_content());
    assert_eq!(editor.tree().text_of(first), "the title");
}

#[test]
fn test_change_records_collapse_per_block() {
    let mut editor = editor_with(sample_document());
    editor.reset_changes();
    for op in [
        ChangeOp::ReplaceBlock("b1".into()),
        ChangeOp::ReplaceBlock("b1".into()),
        ChangeOp::ReplaceBlock("b1".into()),
    ] {
        editor.add_change(op);
    }
    assert_eq!(
        editor.pending_changes(),
        &[ChangeOp::ReplaceBlock("b1".into())]
    );
}

#[test]
fn test_tab_round_trip_keeps_document_content() {
    let mut editor = editor_with(sample_document());
    let select = |editor: &mut Editor, id: &str| {
        let block = editor.tree().block_by_id(&id.into()).unwrap();
        let leaf = editor
            .tree()
            .descendants(block)
            .into_iter()
            .find(|n| editor.tree().kind(*n).is_text())
            .unwrap();
        editor.set_selection(Some(Selection::collapsed(Point::new(leaf, 0))));
    };

    select(&mut editor, "b3");
    let mut promote = KeyEvent::new(Key::Tab, Modifiers::NONE);
    editor.handle_key_down(&mut promote);
    assert!(promote.is_consumed());
    let b3 = editor.tree().block_by_id(&"b3".into()).unwrap();
    assert_eq!(editor.tree().flow_above(b3), None);

    select(&mut editor, "b3");
    let mut demote = KeyEvent::new(Key::Tab, Modifiers::SHIFT);
    editor.handle_key_down(&mut demote);
    assert!(demote.is_consumed());
    let b2 = editor.tree().block_by_id(&"b2".into()).unwrap();
    let b3 = editor.tree().block_by_id(&"b3".into()).unwrap();
    assert_eq!(editor.tree().flow_above(b3), Some(b2));

    assert_tree_legal(&editor);
    let ids: Vec<_> = editor
        .tree()
        .flow_blocks()
        .iter()
        .map(|id| editor.tree().kind(*id).block_id().unwrap().as_str().to_string())
        .collect();
    assert_eq!(ids, vec!["h1", "b1", "b2", "b3"]);
}

#[test]
fn test_save_cycle_produces_patch_and_resets() {
    let mut editor = editor_with(sample_document());
    editor.set_title("Notes");
    let b2 = editor.tree().block_by_id(&"b2".into()).unwrap();
    editor.set_type(b2, BlockType::Blockquote);

    let patch = editor.transform_changes();
    assert!(!patch.is_empty());
    let json = serde_json::to_string(&patch).unwrap();
    assert!(json.contains(r#""op":"setTitle""#));
    assert!(json.contains(r#""op":"replaceBlock""#));

    editor.reset_changes();
    assert!(editor.pending_changes().is_empty());
    assert!(editor.transform_changes().is_empty());
}
