//! Markdown block model, parser, serializer and editing session.
//!
//! A document is a flat, ordered sequence of [`Block`]s. List nesting is not stored
//! as a tree: every list item carries its depth and the nesting is implied by the
//! depths of consecutive list items (a pre-order flattening of the original tree).

use crate::config::Config;
use crate::edit::{self, EditOp};
use crate::inline::{InlineElement, plain_text};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod parser;
pub mod serializer;
pub mod validate;

pub use parser::{parse, parse_document, parse_with_config};
pub use serializer::{render_inline, serialize, serialize_with_config};
pub use validate::{DepthViolation, check_list_depths, same_structure};

pub type BlockId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    pub kind: BlockKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockKind {
    Heading {
        level: u8,
        children: Vec<InlineElement>,
    },
    Paragraph {
        children: Vec<InlineElement>,
    },
    ListItem {
        children: Vec<InlineElement>,
        list: ListMeta,
    },
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        code: String,
    },
    Diagram {
        code: String,
    },
    Image {
        src: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Blockquote {
        children: Vec<InlineElement>,
    },
    ThematicBreak,
    Table {
        align: Vec<ColumnAlignment>,
        rows: Vec<Vec<Vec<InlineElement>>>,
    },
    RawBlock {
        html: String,
    },
    /// Unknown `type` tag coming in through JSON.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    pub depth: usize,
    pub ordered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default)]
    pub marker: MarkerStyle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerStyle {
    #[default]
    Bullet,
    Decimal,
    LowerAlpha,
    LowerRoman,
}

impl MarkerStyle {
    pub fn is_ordered(self) -> bool {
        !matches!(self, MarkerStyle::Bullet)
    }

    pub fn for_ordering(ordered: bool) -> Self {
        if ordered {
            MarkerStyle::Decimal
        } else {
            MarkerStyle::Bullet
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl ListMeta {
    pub fn new(depth: usize, ordered: bool) -> Self {
        Self {
            depth,
            ordered,
            checked: None,
            marker: MarkerStyle::for_ordering(ordered),
        }
    }
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
        }
    }

    pub fn with_id(id: BlockId, kind: BlockKind) -> Self {
        Self { id, kind }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph {
            children: text_children(text),
        })
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading {
            level: level.clamp(1, 6),
            children: text_children(text),
        })
    }

    pub fn list_item(depth: usize, ordered: bool, text: impl Into<String>) -> Self {
        Self::new(BlockKind::ListItem {
            children: text_children(text),
            list: ListMeta::new(depth, ordered),
        })
    }

    pub fn list_meta(&self) -> Option<&ListMeta> {
        match &self.kind {
            BlockKind::ListItem { list, .. } => Some(list),
            _ => None,
        }
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self.kind, BlockKind::ListItem { .. })
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.kind, BlockKind::Heading { .. })
    }

    /// Rendering indentation: the depth for list items, zero otherwise.
    pub fn indentation_level(&self) -> usize {
        self.list_meta().map(|list| list.depth).unwrap_or(0)
    }

    pub fn inline_children(&self) -> Option<&[InlineElement]> {
        match &self.kind {
            BlockKind::Heading { children, .. }
            | BlockKind::Paragraph { children }
            | BlockKind::ListItem { children, .. }
            | BlockKind::Blockquote { children } => Some(children),
            _ => None,
        }
    }

    pub fn plain_text(&self) -> String {
        match &self.kind {
            BlockKind::Code { code, .. } | BlockKind::Diagram { code } => code.clone(),
            BlockKind::Image { alt, .. } => alt.clone(),
            BlockKind::RawBlock { html } => html.clone(),
            _ => self.inline_children().map(plain_text).unwrap_or_default(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

impl BlockKind {
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Heading { .. } => "heading",
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::ListItem { .. } => "listItem",
            BlockKind::Code { .. } => "code",
            BlockKind::Diagram { .. } => "diagram",
            BlockKind::Image { .. } => "image",
            BlockKind::Blockquote { .. } => "blockquote",
            BlockKind::ThematicBreak => "thematicBreak",
            BlockKind::Table { .. } => "table",
            BlockKind::RawBlock { .. } => "rawBlock",
            BlockKind::Unsupported => "unsupported",
        }
    }
}

pub(crate) fn text_children(text: impl Into<String>) -> Vec<InlineElement> {
    let text = text.into();
    if text.is_empty() {
        Vec::new()
    } else {
        vec![InlineElement::text(text)]
    }
}

/// One editor session: the block sequence plus what is needed to round-trip it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub frontmatter: Option<String>,
    blocks: Vec<Block>,
    config: Config,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        Self::parse_with_config(text, Config::default())
    }

    pub fn parse_with_config(text: &str, config: Config) -> Self {
        let (frontmatter, blocks) = parse_document(text, &config);
        Self {
            frontmatter,
            blocks,
            config,
        }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            frontmatter: None,
            blocks,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn find(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    /// Applies one edit. Returns whether the sequence changed.
    pub fn apply(&mut self, op: EditOp) -> bool {
        let next = edit::apply(&self.blocks, &op, &self.config);
        if next == self.blocks {
            return false;
        }
        self.blocks = next;
        true
    }

    /// Applies ops in order, returning how many of them changed the sequence.
    pub fn apply_all(&mut self, ops: impl IntoIterator<Item = EditOp>) -> usize {
        ops.into_iter().filter(|op| self.apply(op.clone())).count()
    }

    pub fn serialize(&self) -> String {
        let body = serialize_with_config(&self.blocks, &self.config);
        match &self.frontmatter {
            Some(frontmatter) => {
                let mut output = String::from("---\n");
                output.push_str(frontmatter);
                output.push_str("\n---\n");
                if !body.is_empty() {
                    output.push('\n');
                    output.push_str(&body);
                }
                output
            }
            None => body,
        }
    }
}
