//! Structural edit operations over a block sequence.
//!
//! Every operation is pure: it reads `&[Block]` and returns a new `Vec<Block>`.
//! The `try_*` forms report why an edit was rejected; the plain forms log the
//! rejection at warn level and hand back an unchanged copy of the input.

use crate::config::Config;
use crate::doc::{Block, BlockId, BlockKind, MarkerStyle, parse_with_config, text_children};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{trace, warn};

pub mod indent;
pub mod insert;

pub use indent::{indent, outdent, toggle_checked, try_indent, try_outdent, try_toggle_checked};
pub use insert::{InsertKind, insert_after, insert_block_after, try_insert_after};

static CHECKBOX_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([-*+]|\d+[.)])\s+\[[ xX]\]").expect("checkbox pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditOp {
    Reorder {
        source: BlockId,
        target: BlockId,
    },
    Delete {
        id: BlockId,
    },
    ReplaceContent {
        id: BlockId,
        text: String,
    },
    InsertAfter {
        anchor: BlockId,
        kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        marker_style: Option<MarkerStyle>,
    },
    Indent {
        id: BlockId,
    },
    Outdent {
        id: BlockId,
    },
    ToggleChecked {
        id: BlockId,
    },
}

impl EditOp {
    pub fn name(&self) -> &'static str {
        match self {
            EditOp::Reorder { .. } => "reorder",
            EditOp::Delete { .. } => "delete",
            EditOp::ReplaceContent { .. } => "replaceContent",
            EditOp::InsertAfter { .. } => "insertAfter",
            EditOp::Indent { .. } => "indent",
            EditOp::Outdent { .. } => "outdent",
            EditOp::ToggleChecked { .. } => "toggleChecked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("block not found: {0}")]
    BlockNotFound(BlockId),
    #[error("block {0} is not a list item")]
    NotAListItem(BlockId),
    #[error("block {0} is not a task list item")]
    NotATaskItem(BlockId),
    #[error("re-parse produced {blocks} block(s), expected a single list item")]
    ReparseMismatch { blocks: usize },
    #[error("unknown insert kind: {0}")]
    UnknownInsertKind(String),
    #[error("content replacement is not handled for {0} blocks")]
    Unhandled(&'static str),
    #[error("list item {0} has no previous sibling to nest under")]
    CannotIndent(BlockId),
    #[error("list item {0} is already at the top level")]
    CannotOutdent(BlockId),
}

/// Applies one operation, returning the input unchanged when it is rejected.
pub fn apply(blocks: &[Block], op: &EditOp, config: &Config) -> Vec<Block> {
    or_unchanged(blocks, op.name(), try_apply(blocks, op, config))
}

pub fn try_apply(blocks: &[Block], op: &EditOp, config: &Config) -> Result<Vec<Block>, EditError> {
    match op {
        EditOp::Reorder { source, target } => try_reorder(blocks, *source, *target),
        EditOp::Delete { id } => try_delete(blocks, *id),
        EditOp::ReplaceContent { id, text } => try_replace_content(blocks, *id, text, config),
        EditOp::InsertAfter {
            anchor,
            kind,
            marker_style,
        } => try_insert_after(blocks, *anchor, kind, *marker_style),
        EditOp::Indent { id } => try_indent(blocks, *id),
        EditOp::Outdent { id } => try_outdent(blocks, *id),
        EditOp::ToggleChecked { id } => try_toggle_checked(blocks, *id, config),
    }
}

pub(crate) fn or_unchanged(
    blocks: &[Block],
    op: &'static str,
    result: Result<Vec<Block>, EditError>,
) -> Vec<Block> {
    match result {
        Ok(next) => {
            trace!(op, blocks = next.len(), "edit applied");
            next
        }
        Err(err) => {
            warn!(op, error = %err, "edit rejected");
            blocks.to_vec()
        }
    }
}

pub(crate) fn position(blocks: &[Block], id: BlockId) -> Result<usize, EditError> {
    blocks
        .iter()
        .position(|block| block.id == id)
        .ok_or(EditError::BlockNotFound(id))
}

pub fn reorder(blocks: &[Block], source: BlockId, target: BlockId) -> Vec<Block> {
    or_unchanged(blocks, "reorder", try_reorder(blocks, source, target))
}

/// Moves `source` to the index `target` currently occupies. Depths are left as is.
pub fn try_reorder(
    blocks: &[Block],
    source: BlockId,
    target: BlockId,
) -> Result<Vec<Block>, EditError> {
    let from = position(blocks, source)?;
    let to = position(blocks, target)?;
    let mut next = blocks.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    Ok(next)
}

pub fn delete(blocks: &[Block], id: BlockId) -> Vec<Block> {
    or_unchanged(blocks, "delete", try_delete(blocks, id))
}

/// Removes one block. Nested list items that followed it keep their depths.
pub fn try_delete(blocks: &[Block], id: BlockId) -> Result<Vec<Block>, EditError> {
    let index = position(blocks, id)?;
    let mut next = blocks.to_vec();
    next.remove(index);
    Ok(next)
}

pub fn replace_content(blocks: &[Block], id: BlockId, text: &str, config: &Config) -> Vec<Block> {
    or_unchanged(
        blocks,
        "replaceContent",
        try_replace_content(blocks, id, text, config),
    )
}

pub fn try_replace_content(
    blocks: &[Block],
    id: BlockId,
    text: &str,
    config: &Config,
) -> Result<Vec<Block>, EditError> {
    let index = position(blocks, id)?;
    let block = &blocks[index];
    let mut next = blocks.to_vec();

    match &block.kind {
        BlockKind::ListItem { list, .. } if is_checkbox_item(text) => {
            next[index] = reparse_list_item(text, config, block.id, list.depth)?;
        }
        BlockKind::Paragraph { .. } => {
            let mut replacement = parse_with_config(text, &fragment_config(config));
            if replacement.is_empty() {
                replacement.push(Block::paragraph(""));
            }
            next.splice(index..=index, replacement);
        }
        BlockKind::Heading { .. } | BlockKind::Blockquote { .. } | BlockKind::ListItem { .. } => {
            let mut updated = block.clone();
            if let BlockKind::Heading { children, .. }
            | BlockKind::Blockquote { children }
            | BlockKind::ListItem { children, .. } = &mut updated.kind
            {
                *children = text_children(text);
            }
            next[index] = updated;
        }
        BlockKind::Code { .. } | BlockKind::Diagram { .. } => {
            let mut updated = block.clone();
            if let BlockKind::Code { code, .. } | BlockKind::Diagram { code } = &mut updated.kind {
                *code = text.to_string();
            }
            next[index] = updated;
        }
        other => return Err(EditError::Unhandled(other.name())),
    }
    Ok(next)
}

pub(crate) fn is_checkbox_item(text: &str) -> bool {
    CHECKBOX_ITEM.is_match(text)
}

/// Re-parses a single task list line into a list item that keeps `id` and `depth`.
pub(crate) fn reparse_list_item(
    text: &str,
    config: &Config,
    id: BlockId,
    depth: usize,
) -> Result<Block, EditError> {
    let mut parsed = parse_with_config(text, &fragment_config(config));
    if parsed.len() != 1 {
        return Err(EditError::ReparseMismatch {
            blocks: parsed.len(),
        });
    }
    let block = parsed.remove(0);
    match block.kind {
        BlockKind::ListItem { children, mut list } => {
            list.depth = depth;
            Ok(Block::with_id(id, BlockKind::ListItem { children, list }))
        }
        _ => Err(EditError::ReparseMismatch { blocks: 1 }),
    }
}

/// Fragments typed into a block are never front matter.
fn fragment_config(config: &Config) -> Config {
    Config {
        front_matter: false,
        ..config.clone()
    }
}
