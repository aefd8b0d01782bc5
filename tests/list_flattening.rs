use md_blocks::{
    Block, BlockKind, InlineElement, MarkerStyle, check_list_depths, parse, serialize,
};

fn depths(blocks: &[Block]) -> Vec<usize> {
    blocks.iter().map(Block::indentation_level).collect()
}

fn leading_spaces(output: &str) -> Vec<usize> {
    output
        .lines()
        .map(|line| line.len() - line.trim_start().len())
        .collect()
}

#[test]
fn nested_bullets_flatten_and_restore() {
    let blocks = parse("- Item 1\n  - Item 2a\n  - Item 2b\n- Item 3");
    assert_eq!(depths(&blocks), vec![0, 1, 1, 0]);
    assert!(blocks.iter().all(|block| !block.list_meta().unwrap().ordered));

    let output = serialize(&blocks);
    assert_eq!(output.lines().count(), 4);
    assert_eq!(leading_spaces(&output), vec![0, 2, 2, 0]);
    assert!(output.lines().all(|line| line.trim_start().starts_with("- ")));

    assert_eq!(depths(&parse(&output)), vec![0, 1, 1, 0]);
}

#[test]
fn ordered_items_render_with_numbers() {
    let blocks = parse("1. A\n2. B");
    assert_eq!(blocks.len(), 2);
    for block in &blocks {
        let list = block.list_meta().unwrap();
        assert!(list.ordered);
        assert_eq!(list.depth, 0);
    }
    assert_eq!(serialize(&blocks), "1. A\n2. B");
}

#[test]
fn pre_order_across_three_levels() {
    let blocks = parse("- a\n  - b\n    - c\n  - d\n    - e\n- f\n  - g");
    let texts: Vec<_> = blocks.iter().map(Block::plain_text).collect();
    assert_eq!(texts, vec!["a", "b", "c", "d", "e", "f", "g"]);
    assert_eq!(depths(&blocks), vec![0, 1, 2, 1, 2, 0, 1]);
    assert_eq!(check_list_depths(&blocks), Ok(()));
}

#[test]
fn mixed_ordering_is_tracked_per_item() {
    let blocks = parse("1. one\n   - bullet\n   - bullet\n2. two\n   1. sub");
    let flags: Vec<_> = blocks
        .iter()
        .map(|block| {
            let list = block.list_meta().unwrap();
            (list.depth, list.ordered, list.marker)
        })
        .collect();
    assert_eq!(
        flags,
        vec![
            (0, true, MarkerStyle::Decimal),
            (1, false, MarkerStyle::Bullet),
            (1, false, MarkerStyle::Bullet),
            (0, true, MarkerStyle::Decimal),
            (1, true, MarkerStyle::Decimal),
        ]
    );
}

#[test]
fn item_content_is_first_paragraph_only() {
    let blocks = parse("- **bold** start\n\n  extra paragraph\n\n  ```\n  code\n  ```\n- next");
    assert_eq!(blocks.len(), 2);
    assert_eq!(
        blocks[0].inline_children().unwrap(),
        &[
            InlineElement::Strong {
                children: vec![InlineElement::text("bold")],
            },
            InlineElement::text(" start"),
        ]
    );
}

#[test]
fn lists_inside_quotes_are_not_flattened() {
    let blocks = parse("> - a\n> - b");
    assert_eq!(blocks.len(), 1);
    assert!(matches!(blocks[0].kind, BlockKind::Blockquote { .. }));
}

#[test]
fn separate_lists_each_start_at_zero() {
    let blocks = parse("- a\n  - b\n\nText\n\n1. c\n   - d");
    assert_eq!(check_list_depths(&blocks), Ok(()));
    assert_eq!(
        blocks.iter().map(Block::kind_name).collect::<Vec<_>>(),
        vec!["listItem", "listItem", "paragraph", "listItem", "listItem"]
    );
}
