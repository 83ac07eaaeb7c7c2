use lys_core::{
    apply_move, parse, serialize, AnchorPosition, Document, EditError, LineEdge, MoveOptions,
    MoveTarget, SelectionRange, TokenId,
};
use std::collections::HashMap;

fn sorted_ids(doc: &Document) -> Vec<TokenId> {
    let mut ids: Vec<_> = doc.token_ids().collect();
    ids.sort();
    ids
}

fn texts(doc: &Document, line_index: usize) -> Vec<String> {
    doc.lines[line_index]
        .tokens
        .iter()
        .map(|token| token.text.clone())
        .collect()
}

#[test]
fn moving_to_anchor_before_matches_documented_example() {
    let mut doc = parse("[4]Hello(100,200)World(300,150)");
    let line = doc.lines[0].clone();
    apply_move(
        &mut doc,
        &[SelectionRange::single(line.id, line.tokens[1].id)],
        &MoveTarget::Anchor {
            line_id: line.id,
            anchor_token_id: line.tokens[0].id,
            position: AnchorPosition::Before,
        },
        MoveOptions::default(),
    )
    .unwrap();
    assert_eq!(serialize(&doc), "[4]World(300,150)Hello(100,200)");
}

#[test]
fn multi_range_move_preserves_document_order_and_conserves_tokens() {
    let mut doc = parse("a(1,1)b(2,1)c(3,1)\nd(4,1)e(5,1)\nf(6,1)g(7,1)");
    let before_ids = sorted_ids(&doc);
    let before_count = doc.token_count();
    let (l0, l1, l2) = (doc.lines[0].clone(), doc.lines[1].clone(), doc.lines[2].clone());

    // Submitted out of document order, one range reversed.
    let ranges = [
        SelectionRange::single(l1.id, l1.tokens[1].id),
        SelectionRange::new(l0.id, l0.tokens[2].id, l0.tokens[1].id),
    ];
    apply_move(
        &mut doc,
        &ranges,
        &MoveTarget::Anchor {
            line_id: l2.id,
            anchor_token_id: l2.tokens[0].id,
            position: AnchorPosition::After,
        },
        MoveOptions::default(),
    )
    .unwrap();

    assert_eq!(serialize(&doc), "a(1,1)\nd(4,1)\nf(6,1)b(2,1)c(3,1)e(5,1)g(7,1)");
    assert_eq!(doc.token_count(), before_count);
    assert_eq!(sorted_ids(&doc), before_ids);
}

#[test]
fn moved_tokens_keep_identity_and_timestamps() {
    let mut doc = parse("a(1,10)b(2,20)\nc(3,30)");
    let original: HashMap<_, _> = doc
        .lines
        .iter()
        .flat_map(|line| line.tokens.iter())
        .map(|token| (token.id, (token.text.clone(), token.timestamp)))
        .collect();
    let (l0, l1) = (doc.lines[0].clone(), doc.lines[1].clone());

    apply_move(
        &mut doc,
        &[SelectionRange::new(l0.id, l0.tokens[0].id, l0.tokens[1].id)],
        &MoveTarget::LineEdge {
            line_id: l1.id,
            position: LineEdge::End,
        },
        MoveOptions::default(),
    )
    .unwrap();

    assert_eq!(doc.lines.len(), 1);
    assert_eq!(doc.lines[0].id, l1.id);
    for token in &doc.lines[0].tokens {
        assert_eq!(original[&token.id], (token.text.clone(), token.timestamp));
    }
    assert_eq!(texts(&doc, 0), vec!["c", "a", "b"]);
}

#[test]
fn new_line_target_after_named_line_and_at_start() {
    let mut doc = parse("[ti:Song]\na(1,1)b(2,1)\nc(3,1)");
    let (meta, l1, l2) = (doc.lines[0].clone(), doc.lines[1].clone(), doc.lines[2].clone());

    apply_move(
        &mut doc,
        &[SelectionRange::single(l1.id, l1.tokens[1].id)],
        &MoveTarget::NewLine {
            insert_after_line_id: Some(l1.id),
        },
        MoveOptions::default(),
    )
    .unwrap();
    assert_eq!(serialize(&doc), "[ti:Song]\na(1,1)\nb(2,1)\nc(3,1)");
    let new_line_id = doc.lines[2].id;
    assert_ne!(new_line_id, l1.id);
    assert_ne!(new_line_id, l2.id);

    apply_move(
        &mut doc,
        &[SelectionRange::single(l2.id, l2.tokens[0].id)],
        &MoveTarget::NewLine {
            insert_after_line_id: None,
        },
        MoveOptions::default(),
    )
    .unwrap();
    assert_eq!(serialize(&doc), "c(3,1)\n[ti:Song]\na(1,1)\nb(2,1)");
    assert_eq!(doc.lines[1].id, meta.id);
}

#[test]
fn cleanup_keeps_meta_lines_and_drops_empty_lyric_lines() {
    let mut doc = parse("[ti:Song]\n\na(1,1)\nb(2,1)");
    let (l2, l3) = (doc.lines[2].clone(), doc.lines[3].clone());
    apply_move(
        &mut doc,
        &[SelectionRange::single(l3.id, l3.tokens[0].id)],
        &MoveTarget::LineEdge {
            line_id: l2.id,
            position: LineEdge::Start,
        },
        MoveOptions::default(),
    )
    .unwrap();
    assert_eq!(serialize(&doc), "[ti:Song]\nb(2,1)a(1,1)");
}

#[test]
fn unresolved_ids_fail_without_touching_document() {
    let mut doc = parse("a(1,1)b(2,1)");
    let before = doc.clone();
    let line = doc.lines[0].clone();
    let missing = uuid::Uuid::new_v4();

    let err = apply_move(
        &mut doc,
        &[SelectionRange::single(line.id, line.tokens[0].id)],
        &MoveTarget::Anchor {
            line_id: line.id,
            anchor_token_id: missing,
            position: AnchorPosition::Before,
        },
        MoveOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EditError::TokenNotFound { .. }));
    assert_eq!(doc, before);

    let err = apply_move(
        &mut doc,
        &[SelectionRange::single(line.id, line.tokens[0].id)],
        &MoveTarget::NewLine {
            insert_after_line_id: Some(missing),
        },
        MoveOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err, EditError::LineNotFound(missing));
    assert_eq!(doc, before);
}

#[test]
fn move_target_deserializes_from_tagged_json() {
    let line_id = uuid::Uuid::new_v4();
    let target: MoveTarget = serde_json::from_value(serde_json::json!({
        "type": "line_edge",
        "line_id": line_id,
        "position": "start"
    }))
    .unwrap();
    assert_eq!(
        target,
        MoveTarget::LineEdge {
            line_id,
            position: LineEdge::Start
        }
    );

    let target: MoveTarget =
        serde_json::from_value(serde_json::json!({ "type": "new_line" })).unwrap();
    assert_eq!(
        target,
        MoveTarget::NewLine {
            insert_after_line_id: None
        }
    );

    let bad = serde_json::from_value::<MoveTarget>(serde_json::json!({
        "type": "line_edge",
        "line_id": line_id,
        "position": "middle"
    }));
    assert!(bad.is_err());
}
