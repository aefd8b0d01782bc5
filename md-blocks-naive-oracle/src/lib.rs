//! A naive, tree-based oracle for list edits, used in differential testing.
//!
//! The list is held as an explicit tree of nodes. Edits are plain tree edits and the
//! result is flattened back to depth-tagged blocks for comparison.
use md_blocks::{Block, BlockId, BlockKind};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    block: Block,
    children: Vec<Node>,
}

impl Node {
    fn leaf(block: Block) -> Self {
        Self {
            block,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListTree {
    roots: Vec<Node>,
}

impl ListTree {
    /// Builds the tree from one run of list items. Depths that skip a level are
    /// attached to the deepest available parent.
    pub fn from_flat(items: &[Block]) -> Self {
        let mut roots: Vec<Node> = Vec::new();
        for block in items {
            let mut siblings = &mut roots;
            for _ in 0..block.indentation_level() {
                if siblings.is_empty() {
                    break;
                }
                let last = siblings.len() - 1;
                siblings = &mut siblings[last].children;
            }
            siblings.push(Node::leaf(block.clone()));
        }
        Self { roots }
    }

    pub fn flatten(&self) -> Vec<Block> {
        let mut out = Vec::new();
        flatten_into(&self.roots, 0, &mut out);
        out
    }

    pub fn len(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes.iter().map(|node| 1 + count(&node.children)).sum()
        }
        count(&self.roots)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Inserts `block` right after `anchor` among its siblings.
    pub fn insert_sibling(&mut self, anchor: BlockId, block: Block) -> bool {
        let Some(path) = path_to(&self.roots, anchor) else {
            return false;
        };
        let Some((index, parent)) = path.split_last() else {
            return false;
        };
        self.siblings_mut(parent).insert(index + 1, Node::leaf(block));
        true
    }

    /// Inserts `block` as the first child of `anchor`.
    pub fn insert_child(&mut self, anchor: BlockId, block: Block) -> bool {
        let Some(path) = path_to(&self.roots, anchor) else {
            return false;
        };
        self.siblings_mut(&path).insert(0, Node::leaf(block));
        true
    }

    /// Makes `id` the last child of its previous sibling.
    pub fn indent(&mut self, id: BlockId) -> bool {
        let Some(path) = path_to(&self.roots, id) else {
            return false;
        };
        let Some((&index, parent)) = path.split_last() else {
            return false;
        };
        if index == 0 {
            return false;
        }
        let siblings = self.siblings_mut(parent);
        let node = siblings.remove(index);
        siblings[index - 1].children.push(node);
        true
    }

    /// Moves `id` after its parent. Its following siblings become its children.
    pub fn outdent(&mut self, id: BlockId) -> bool {
        let Some(path) = path_to(&self.roots, id) else {
            return false;
        };
        if path.len() < 2 {
            return false;
        }
        let (&index, parent) = match path.split_last() {
            Some(split) => split,
            None => return false,
        };
        let (&parent_index, grandparent) = match parent.split_last() {
            Some(split) => split,
            None => return false,
        };

        let siblings = self.siblings_mut(parent);
        let mut node = siblings.remove(index);
        let following = siblings.split_off(index);
        node.children.extend(following);
        self.siblings_mut(grandparent).insert(parent_index + 1, node);
        true
    }

    fn siblings_mut(&mut self, parent: &[usize]) -> &mut Vec<Node> {
        let mut nodes = &mut self.roots;
        for &index in parent {
            nodes = &mut nodes[index].children;
        }
        nodes
    }
}

fn path_to(nodes: &[Node], id: BlockId) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.block.id == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = path_to(&node.children, id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

fn flatten_into(nodes: &[Node], depth: usize, out: &mut Vec<Block>) {
    for node in nodes {
        let mut block = node.block.clone();
        if let BlockKind::ListItem { list, .. } = &mut block.kind {
            list.depth = depth;
        }
        out.push(block);
        flatten_into(&node.children, depth + 1, out);
    }
}
