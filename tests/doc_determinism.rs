use md_blocks::{
    Block, BlockKind, Config, Document, EditOp, InlineElement, ListMeta, MarkerStyle, parse,
    same_structure, serialize, serialize_with_config,
};
use uuid::Uuid;

fn fixed_item(id: u128, depth: usize, text: &str) -> Block {
    Block::with_id(
        Uuid::from_u128(id),
        BlockKind::ListItem {
            children: vec![InlineElement::text(text)],
            list: ListMeta {
                depth,
                ordered: false,
                checked: None,
                marker: MarkerStyle::Bullet,
            },
        },
    )
}

#[test]
fn same_blocks_same_config_is_identical() {
    let blocks = vec![
        Block::heading(1, "Title"),
        fixed_item(1, 0, "a"),
        fixed_item(2, 1, "b"),
    ];
    let config = Config::default();
    let first = serialize_with_config(&blocks, &config);
    let second = serialize_with_config(&blocks, &config);
    assert_eq!(first, second);
}

#[test]
fn ids_do_not_affect_output() {
    let a = vec![fixed_item(1, 0, "x"), fixed_item(2, 1, "y")];
    let b = vec![fixed_item(10, 0, "x"), fixed_item(20, 1, "y")];
    assert_eq!(serialize(&a), serialize(&b));
}

#[test]
fn parsing_twice_gives_same_structure_with_fresh_ids() {
    let input = "# Doc\n\n- a\n  - b\n\n| x |\n|---|\n| 1 |";
    let first = parse(input);
    let second = parse(input);
    assert!(same_structure(&first, &second));
    assert!(first.iter().zip(&second).all(|(a, b)| a.id != b.id));
}

#[test]
fn same_script_same_result() {
    let blocks = vec![fixed_item(1, 0, "a"), fixed_item(2, 1, "b"), fixed_item(3, 0, "c")];
    let script = vec![
        EditOp::Reorder {
            source: Uuid::from_u128(3),
            target: Uuid::from_u128(1),
        },
        EditOp::Indent {
            id: Uuid::from_u128(1),
        },
        EditOp::ReplaceContent {
            id: Uuid::from_u128(2),
            text: "renamed".into(),
        },
    ];

    let mut left = Document::from_blocks(blocks.clone());
    let mut right = Document::from_blocks(blocks);
    assert_eq!(left.apply_all(script.clone()), 3);
    assert_eq!(right.apply_all(script), 3);
    assert_eq!(left.blocks(), right.blocks());
    assert_eq!(left.serialize(), "- c\n  - a\n    - renamed");
}
