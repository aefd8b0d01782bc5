//! Depth changes and checkbox toggling for list items.

use super::{EditError, or_unchanged, position, reparse_list_item};
use crate::config::Config;
use crate::doc::{Block, BlockId, BlockKind, ListMeta, render_inline};

pub fn indent(blocks: &[Block], id: BlockId) -> Vec<Block> {
    or_unchanged(blocks, "indent", try_indent(blocks, id))
}

/// Nests a list item (and everything nested under it) one level deeper, under its
/// previous sibling.
pub fn try_indent(blocks: &[Block], id: BlockId) -> Result<Vec<Block>, EditError> {
    let index = position(blocks, id)?;
    let depth = list_meta(&blocks[index])?.depth;

    let previous_sibling = blocks[..index]
        .iter()
        .rev()
        .map_while(Block::list_meta)
        .find(|list| list.depth <= depth);
    if previous_sibling.map(|list| list.depth) != Some(depth) {
        return Err(EditError::CannotIndent(id));
    }

    Ok(shift_subtree(blocks, index, depth, |depth| depth + 1))
}

pub fn outdent(blocks: &[Block], id: BlockId) -> Vec<Block> {
    or_unchanged(blocks, "outdent", try_outdent(blocks, id))
}

/// Moves a list item (and everything nested under it) one level up. Following
/// siblings stay where they are.
pub fn try_outdent(blocks: &[Block], id: BlockId) -> Result<Vec<Block>, EditError> {
    let index = position(blocks, id)?;
    let depth = list_meta(&blocks[index])?.depth;
    if depth == 0 {
        return Err(EditError::CannotOutdent(id));
    }
    Ok(shift_subtree(blocks, index, depth, |depth| depth - 1))
}

pub fn toggle_checked(blocks: &[Block], id: BlockId, config: &Config) -> Vec<Block> {
    or_unchanged(blocks, "toggleChecked", try_toggle_checked(blocks, id, config))
}

/// Flips a task item's checkbox by re-parsing its Markdown line with the inverted box.
pub fn try_toggle_checked(
    blocks: &[Block],
    id: BlockId,
    config: &Config,
) -> Result<Vec<Block>, EditError> {
    let index = position(blocks, id)?;
    let block = &blocks[index];
    let BlockKind::ListItem { children, list } = &block.kind else {
        return Err(EditError::NotAListItem(id));
    };
    let Some(checked) = list.checked else {
        return Err(EditError::NotATaskItem(id));
    };

    let marker = if list.ordered { "1." } else { "-" };
    let checkbox = if checked { "[ ]" } else { "[x]" };
    let line = format!("{marker} {checkbox} {}", render_inline(children));

    let mut toggled = reparse_list_item(&line, config, id, list.depth)?;
    if let BlockKind::ListItem { list: parsed, .. } = &mut toggled.kind {
        if parsed.checked != Some(!checked) {
            return Err(EditError::ReparseMismatch { blocks: 1 });
        }
        parsed.marker = list.marker;
    }

    let mut next = blocks.to_vec();
    next[index] = toggled;
    Ok(next)
}

fn list_meta(block: &Block) -> Result<&ListMeta, EditError> {
    block.list_meta().ok_or(EditError::NotAListItem(block.id))
}

/// Applies `shift` to the depth of the item at `index` and of the consecutive deeper
/// items that follow it.
fn shift_subtree(
    blocks: &[Block],
    index: usize,
    depth: usize,
    shift: impl Fn(usize) -> usize,
) -> Vec<Block> {
    let mut next = blocks.to_vec();
    for (offset, block) in next[index..].iter_mut().enumerate() {
        let BlockKind::ListItem { list, .. } = &mut block.kind else {
            break;
        };
        if offset > 0 && list.depth <= depth {
            break;
        }
        list.depth = shift(list.depth);
    }
    next
}
