//! Inserting new blocks after an anchor.

use super::{EditError, or_unchanged, position};
use crate::doc::{Block, BlockId, BlockKind, ColumnAlignment, ListMeta, MarkerStyle};
use crate::inline::InlineElement;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertKind {
    ListItemSibling,
    ListItemChild,
    Paragraph,
    Heading1,
    Heading2,
    Code,
    Diagram,
    Image,
    Blockquote,
    Table,
    RawBlock,
    ThematicBreak,
}

impl InsertKind {
    pub const ALL: [InsertKind; 12] = [
        InsertKind::ListItemSibling,
        InsertKind::ListItemChild,
        InsertKind::Paragraph,
        InsertKind::Heading1,
        InsertKind::Heading2,
        InsertKind::Code,
        InsertKind::Diagram,
        InsertKind::Image,
        InsertKind::Blockquote,
        InsertKind::Table,
        InsertKind::RawBlock,
        InsertKind::ThematicBreak,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            InsertKind::ListItemSibling => "addListItemSibling",
            InsertKind::ListItemChild => "addListItemChild",
            InsertKind::Paragraph => "paragraph",
            InsertKind::Heading1 => "heading1",
            InsertKind::Heading2 => "heading2",
            InsertKind::Code => "code",
            InsertKind::Diagram => "diagram",
            InsertKind::Image => "image",
            InsertKind::Blockquote => "blockquote",
            InsertKind::Table => "table",
            InsertKind::RawBlock => "rawBlock",
            InsertKind::ThematicBreak => "thematicBreak",
        }
    }

    pub fn is_list_action(self) -> bool {
        matches!(self, InsertKind::ListItemSibling | InsertKind::ListItemChild)
    }

    /// Placeholder block for the standard kinds; `None` for list actions.
    pub fn default_block(self) -> Option<Block> {
        let kind = match self {
            InsertKind::ListItemSibling | InsertKind::ListItemChild => return None,
            InsertKind::Paragraph => return Some(Block::paragraph("")),
            InsertKind::Heading1 => return Some(Block::heading(1, "Heading")),
            InsertKind::Heading2 => return Some(Block::heading(2, "Heading")),
            InsertKind::Code => BlockKind::Code {
                language: None,
                code: String::new(),
            },
            InsertKind::Diagram => BlockKind::Diagram {
                code: "graph TD\n  A --> B".to_string(),
            },
            InsertKind::Image => BlockKind::Image {
                src: "image.png".to_string(),
                alt: "Image".to_string(),
                title: None,
            },
            InsertKind::Blockquote => BlockKind::Blockquote {
                children: vec![InlineElement::text("Quote")],
            },
            InsertKind::Table => BlockKind::Table {
                align: vec![ColumnAlignment::None; 2],
                rows: vec![
                    vec![
                        vec![InlineElement::text("Column 1")],
                        vec![InlineElement::text("Column 2")],
                    ],
                    vec![Vec::new(), Vec::new()],
                ],
            },
            InsertKind::RawBlock => BlockKind::RawBlock {
                html: "<div></div>".to_string(),
            },
            InsertKind::ThematicBreak => BlockKind::ThematicBreak,
        };
        Some(Block::new(kind))
    }
}

impl FromStr for InsertKind {
    type Err = EditError;

    fn from_str(keyword: &str) -> Result<Self, Self::Err> {
        InsertKind::ALL
            .into_iter()
            .find(|kind| kind.keyword() == keyword)
            .ok_or_else(|| EditError::UnknownInsertKind(keyword.to_string()))
    }
}

impl fmt::Display for InsertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

pub fn insert_after(
    blocks: &[Block],
    anchor: BlockId,
    kind: &str,
    marker: Option<MarkerStyle>,
) -> Vec<Block> {
    or_unchanged(
        blocks,
        "insertAfter",
        try_insert_after(blocks, anchor, kind, marker),
    )
}

pub fn try_insert_after(
    blocks: &[Block],
    anchor: BlockId,
    kind: &str,
    marker: Option<MarkerStyle>,
) -> Result<Vec<Block>, EditError> {
    let kind = kind.parse::<InsertKind>()?;
    insert_block_after(blocks, anchor, kind, marker).map(|(next, _)| next)
}

/// Inserts a new block and returns the new sequence along with the new block's id.
pub fn insert_block_after(
    blocks: &[Block],
    anchor: BlockId,
    kind: InsertKind,
    marker: Option<MarkerStyle>,
) -> Result<(Vec<Block>, BlockId), EditError> {
    let index = position(blocks, anchor)?;

    let (at, block) = match kind {
        InsertKind::ListItemSibling => {
            let list = anchor_list(&blocks[index])?;
            let sibling = ListMeta {
                checked: list.checked.map(|_| false),
                ..list
            };
            (sibling_index(blocks, index, &list), empty_item(sibling))
        }
        InsertKind::ListItemChild => {
            let list = anchor_list(&blocks[index])?;
            let (ordered, marker) = match marker {
                Some(marker) => (marker.is_ordered(), marker),
                None => (list.ordered, list.marker),
            };
            let child = ListMeta {
                depth: list.depth + 1,
                ordered,
                checked: None,
                marker,
            };
            (index + 1, empty_item(child))
        }
        standard => match standard.default_block() {
            Some(block) => (index + 1, block),
            None => return Err(EditError::UnknownInsertKind(standard.to_string())),
        },
    };

    let id = block.id;
    let mut next = blocks.to_vec();
    next.insert(at, block);
    Ok((next, id))
}

fn anchor_list(block: &Block) -> Result<ListMeta, EditError> {
    block
        .list_meta()
        .copied()
        .ok_or(EditError::NotAListItem(block.id))
}

fn empty_item(list: ListMeta) -> Block {
    Block::new(BlockKind::ListItem {
        children: Vec::new(),
        list,
    })
}

/// Index at which a new sibling of the item at `anchor` goes: the first heading,
/// the next item at the same depth and ordering, or the first shallower item after
/// the anchor. Deeper items and other blocks in between are skipped. Stopping at a
/// shallower item closes the subtree of the anchor's parent, so the new sibling never
/// ends up under a different parent.
fn sibling_index(blocks: &[Block], anchor: usize, list: &ListMeta) -> usize {
    blocks
        .iter()
        .enumerate()
        .skip(anchor + 1)
        .find(|(_, block)| {
            if block.is_heading() {
                return true;
            }
            match block.list_meta() {
                Some(other) => {
                    (other.depth == list.depth && other.ordered == list.ordered)
                        || other.depth < list.depth
                }
                None => false,
            }
        })
        .map(|(index, _)| index)
        .unwrap_or(blocks.len())
}
