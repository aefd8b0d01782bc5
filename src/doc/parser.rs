//! Markdown → block sequence.
//!
//! The source tree comes from `comrak` (CommonMark + GFM tables, task lists and
//! strikethrough). The walk below flattens it into blocks. Nothing here fails: node
//! types outside the supported vocabulary are dropped and logged at debug level.

use super::{Block, BlockKind, ColumnAlignment, ListMeta, MarkerStyle};
use crate::config::Config;
use crate::inline::{InlineElement, coalesce};
use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options};
use tracing::debug;

pub fn parse(text: &str) -> Vec<Block> {
    parse_with_config(text, &Config::default())
}

pub fn parse_with_config(text: &str, config: &Config) -> Vec<Block> {
    parse_document(text, config).1
}

/// Parses `text`, returning the front matter body (without delimiters) and the blocks.
pub fn parse_document(text: &str, config: &Config) -> (Option<String>, Vec<Block>) {
    let arena = Arena::new();
    let options = comrak_options(config);
    let root = comrak::parse_document(&arena, text, &options);

    let mut flattener = Flattener {
        config,
        frontmatter: None,
        blocks: Vec::new(),
    };
    for node in root.children() {
        flattener.block(node);
    }
    (flattener.frontmatter, flattener.blocks)
}

fn comrak_options(config: &Config) -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    if config.front_matter {
        options.extension.front_matter_delimiter = Some("---".to_string());
    }
    options
}

struct Flattener<'c> {
    config: &'c Config,
    frontmatter: Option<String>,
    blocks: Vec<Block>,
}

impl Flattener<'_> {
    fn block<'a>(&mut self, node: &'a AstNode<'a>) {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::FrontMatter(raw) => {
                self.frontmatter = Some(front_matter_body(raw));
            }
            NodeValue::Heading(heading) => {
                self.push(BlockKind::Heading {
                    level: heading.level,
                    children: inline_content(node),
                });
            }
            NodeValue::Paragraph => {
                let kind = match sole_image(node) {
                    Some(image) => image_block(image),
                    None => BlockKind::Paragraph {
                        children: inline_content(node),
                    },
                };
                self.push(kind);
            }
            NodeValue::List(_) => self.list(node, 0),
            NodeValue::CodeBlock(code) => {
                let language = code.info.split_whitespace().next().map(str::to_string);
                let body = code
                    .literal
                    .strip_suffix('\n')
                    .unwrap_or(&code.literal)
                    .to_string();
                let kind = match language {
                    Some(lang) if self.config.is_diagram_language(&lang) => {
                        BlockKind::Diagram { code: body }
                    }
                    language => BlockKind::Code {
                        language,
                        code: body,
                    },
                };
                self.push(kind);
            }
            NodeValue::BlockQuote => {
                let mut children = Vec::new();
                for child in node.children() {
                    let content = inline_content(child);
                    if content.is_empty() {
                        continue;
                    }
                    if !children.is_empty() {
                        children.push(InlineElement::text("\n"));
                    }
                    children.extend(content);
                }
                self.push(BlockKind::Blockquote {
                    children: coalesce(children),
                });
            }
            NodeValue::ThematicBreak => self.push(BlockKind::ThematicBreak),
            NodeValue::Table(table) => {
                let align: Vec<ColumnAlignment> = table
                    .alignments
                    .iter()
                    .map(|alignment| match alignment {
                        TableAlignment::None => ColumnAlignment::None,
                        TableAlignment::Left => ColumnAlignment::Left,
                        TableAlignment::Center => ColumnAlignment::Center,
                        TableAlignment::Right => ColumnAlignment::Right,
                    })
                    .collect();
                let rows = node
                    .children()
                    .map(|row| {
                        let mut cells: Vec<Vec<InlineElement>> =
                            row.children().map(first_paragraph_or_direct).collect();
                        cells.resize(align.len(), Vec::new());
                        cells
                    })
                    .collect();
                self.push(BlockKind::Table { align, rows });
            }
            NodeValue::HtmlBlock(html) => {
                self.push(BlockKind::RawBlock {
                    html: html.literal.trim_end_matches('\n').to_string(),
                });
            }
            other => {
                debug!(node = ?other, "dropping unsupported block node");
            }
        }
    }

    /// Emits one list item per entry, then recurses into the first nested list.
    fn list<'a>(&mut self, list: &'a AstNode<'a>, depth: usize) {
        let ordered = match &list.data.borrow().value {
            NodeValue::List(meta) => matches!(meta.list_type, ListType::Ordered),
            _ => return,
        };

        for item in list.children() {
            let checked = match &item.data.borrow().value {
                NodeValue::Item(_) => None,
                NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
                other => {
                    debug!(node = ?other, "dropping non-item list child");
                    continue;
                }
            };

            self.push(BlockKind::ListItem {
                children: first_paragraph_or_direct(item),
                list: ListMeta {
                    depth,
                    ordered,
                    checked,
                    marker: MarkerStyle::for_ordering(ordered),
                },
            });

            let nested = item
                .children()
                .find(|child| matches!(child.data.borrow().value, NodeValue::List(_)));
            if let Some(nested) = nested {
                self.list(nested, depth + 1);
            }
        }
    }

    fn push(&mut self, kind: BlockKind) {
        self.blocks.push(Block::new(kind));
    }
}

fn front_matter_body(raw: &str) -> String {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix("---").unwrap_or(trimmed);
    let body = body.strip_suffix("---").unwrap_or(body);
    body.trim_matches(|c: char| c == '\n' || c == '\r').to_string()
}

fn sole_image<'a>(paragraph: &'a AstNode<'a>) -> Option<&'a AstNode<'a>> {
    let mut children = paragraph.children();
    let first = children.next()?;
    if children.next().is_some() {
        return None;
    }
    let is_image = matches!(first.data.borrow().value, NodeValue::Image(_));
    is_image.then_some(first)
}

fn image_block<'a>(image: &'a AstNode<'a>) -> BlockKind {
    let alt = collect_text(image);
    let data = image.data.borrow();
    match &data.value {
        NodeValue::Image(link) => BlockKind::Image {
            src: link.url.clone(),
            alt,
            title: non_empty(&link.title),
        },
        _ => BlockKind::Paragraph {
            children: Vec::new(),
        },
    }
}

/// Inline content of the first child when it is a paragraph, otherwise the node's
/// own direct inline children. Used for list items and table cells.
fn first_paragraph_or_direct<'a>(node: &'a AstNode<'a>) -> Vec<InlineElement> {
    match node.first_child() {
        Some(first) if matches!(first.data.borrow().value, NodeValue::Paragraph) => {
            inline_content(first)
        }
        _ => inline_content(node),
    }
}

fn inline_content<'a>(node: &'a AstNode<'a>) -> Vec<InlineElement> {
    let mut out = Vec::new();
    collect_inline(node, &mut out);
    coalesce(out)
}

fn collect_inline<'a>(node: &'a AstNode<'a>, out: &mut Vec<InlineElement>) {
    for child in node.children() {
        let data = child.data.borrow();
        match &data.value {
            NodeValue::Text(text) => out.push(InlineElement::text(text.clone())),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(InlineElement::text("\n")),
            NodeValue::Code(code) => out.push(InlineElement::InlineCode {
                value: code.literal.clone(),
            }),
            NodeValue::HtmlInline(html) => out.push(InlineElement::RawMarkup {
                value: html.clone(),
            }),
            NodeValue::Strong => out.push(InlineElement::Strong {
                children: nested_inline(child),
            }),
            NodeValue::Emph => out.push(InlineElement::Emphasis {
                children: nested_inline(child),
            }),
            NodeValue::Strikethrough => out.push(InlineElement::Delete {
                children: nested_inline(child),
            }),
            NodeValue::Link(link) => out.push(InlineElement::Link {
                url: link.url.clone(),
                title: non_empty(&link.title),
                children: nested_inline(child),
            }),
            // Block content is handled by the block-level walk.
            value if value.block() => {}
            other => {
                debug!(node = ?other, "dropping unsupported inline node");
            }
        }
    }
}

fn nested_inline<'a>(node: &'a AstNode<'a>) -> Vec<InlineElement> {
    let mut children = Vec::new();
    collect_inline(node, &mut children);
    children
}

fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(value) => text.push_str(value),
            NodeValue::Code(code) => text.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
            _ => text.push_str(&collect_text(child)),
        }
    }
    text
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
