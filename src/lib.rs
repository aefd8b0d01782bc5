//! md-blocks: a flat block model for Markdown editing.
//!
//! Markdown is parsed into an ordered sequence of addressable blocks. Nested lists
//! are flattened into list items that carry an explicit depth, so an editor can
//! address every item by id and move, insert, indent or delete it without walking a
//! tree. The crate includes:
//!
//! - **Parser** - CommonMark + GFM tables and task lists, flattened to blocks
//! - **Serializer** - rebuilds Markdown with renumbered markers and list indentation
//! - **Edit operations** - reorder, delete, content replacement with re-parse,
//!   sibling/child insertion, indent/outdent and checkbox toggling
//!
//! # Quick Start
//!
//! ```rust
//! use md_blocks::{Document, EditOp};
//!
//! let mut doc = Document::parse("- Item 1\n  - Item 2\n- Item 3");
//! assert_eq!(doc.len(), 3);
//!
//! let first = doc.blocks()[0].id;
//! doc.apply(EditOp::InsertAfter {
//!     anchor: first,
//!     kind: "addListItemSibling".into(),
//!     marker_style: None,
//! });
//! assert_eq!(doc.serialize(), "- Item 1\n  - Item 2\n- \n- Item 3");
//! ```
//!
//! # Features
//!
//! - `cli` (default) - builds the `md-blocks` command-line tool

// Parser and serializer configuration
pub mod config;

// Block model, parser, serializer and session
pub mod doc;

// Structural edit operations
pub mod edit;

// Inline content model
pub mod inline;

pub use config::{Config, ConfigError};

pub use doc::{
    Block, BlockId, BlockKind, ColumnAlignment, DepthViolation, Document, ListMeta,
    MarkerStyle, check_list_depths, parse, parse_document, parse_with_config, render_inline,
    same_structure, serialize, serialize_with_config,
};

pub use edit::{EditError, EditOp, InsertKind};

pub use inline::InlineElement;
