//! Structural checks over a block sequence.

use super::{Block, BlockId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepthViolation {
    #[error("list item {id} at index {index} starts a list at depth {depth}")]
    RunStartsNested {
        index: usize,
        id: BlockId,
        depth: usize,
    },
    #[error("list item {id} at index {index} jumps from depth {previous} to {depth}")]
    DepthJump {
        index: usize,
        id: BlockId,
        previous: usize,
        depth: usize,
    },
}

impl DepthViolation {
    pub fn index(&self) -> usize {
        match self {
            DepthViolation::RunStartsNested { index, .. }
            | DepthViolation::DepthJump { index, .. } => *index,
        }
    }
}

/// Checks that every run of consecutive list items starts at depth 0 and never
/// deepens by more than one level per step.
pub fn check_list_depths(blocks: &[Block]) -> Result<(), DepthViolation> {
    let mut previous: Option<usize> = None;
    for (index, block) in blocks.iter().enumerate() {
        let Some(list) = block.list_meta() else {
            previous = None;
            continue;
        };
        match previous {
            None if list.depth != 0 => {
                return Err(DepthViolation::RunStartsNested {
                    index,
                    id: block.id,
                    depth: list.depth,
                });
            }
            Some(previous) if list.depth > previous + 1 => {
                return Err(DepthViolation::DepthJump {
                    index,
                    id: block.id,
                    previous,
                    depth: list.depth,
                });
            }
            _ => {}
        }
        previous = Some(list.depth);
    }
    Ok(())
}

/// Compares two sequences block by block, ignoring ids.
pub fn same_structure(left: &[Block], right: &[Block]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(a, b)| a.kind == b.kind)
}
