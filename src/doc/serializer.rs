//! Block sequence → Markdown.
//!
//! One left-to-right pass. The only state carried between blocks is what list
//! rendering needs: the ordered counter, the previous list depth and ordering, and
//! the content column of the most recent item at each depth.

use super::{Block, BlockKind, ColumnAlignment, ListMeta};
use crate::config::Config;
use crate::inline::InlineElement;
use unicode_segmentation::UnicodeSegmentation;

const UNSUPPORTED_BLOCK: &str = "<!-- unsupported block -->";
const UNSUPPORTED_INLINE: &str = "<!-- unsupported inline -->";

pub fn serialize(blocks: &[Block]) -> String {
    serialize_with_config(blocks, &Config::default())
}

pub fn serialize_with_config(blocks: &[Block], config: &Config) -> String {
    let mut writer = Writer::new(config);
    for block in blocks {
        writer.block(block);
    }
    writer.out
}

#[derive(Debug, Default)]
struct ListState {
    /// `None` when the previous block was not a list item.
    depth: Option<usize>,
    ordered: bool,
    counter: usize,
    /// Content column of the latest item at each depth.
    columns: Vec<usize>,
}

impl ListState {
    fn reset(&mut self) {
        self.depth = None;
        self.ordered = false;
        self.columns.clear();
    }

    fn advance(&mut self, list: &ListMeta) {
        match self.depth {
            Some(previous) if list.depth == previous && list.ordered == self.ordered => {
                self.counter += 1;
            }
            // Returning to a shallower level of the same ordering keeps the counter.
            Some(previous) if list.depth < previous && list.ordered == self.ordered => {}
            _ => self.counter = 1,
        }
        self.depth = Some(list.depth);
        self.ordered = list.ordered;
    }

    fn indent(&self, depth: usize, config: &Config) -> usize {
        if depth == 0 {
            return 0;
        }
        self.columns
            .get(depth - 1)
            .copied()
            .unwrap_or(depth * config.list_indent)
    }
}

struct Writer<'c> {
    config: &'c Config,
    out: String,
    previous_was_list: Option<bool>,
    list: ListState,
}

impl<'c> Writer<'c> {
    fn new(config: &'c Config) -> Self {
        Self {
            config,
            out: String::new(),
            previous_was_list: None,
            list: ListState::default(),
        }
    }

    fn block(&mut self, block: &Block) {
        let is_list = block.is_list_item();
        match self.previous_was_list {
            Some(true) if is_list => self.out.push('\n'),
            Some(_) => self.out.push_str("\n\n"),
            None => {}
        }
        self.previous_was_list = Some(is_list);

        match &block.kind {
            BlockKind::ListItem { children, list } => self.list_item(children, list),
            kind => {
                self.list.reset();
                let rendered = render_block(kind, self.config);
                self.out.push_str(&rendered);
            }
        }
    }

    fn list_item(&mut self, children: &[InlineElement], list: &ListMeta) {
        self.list.advance(list);

        let indent = self.list.indent(list.depth, self.config);
        let marker = if list.ordered {
            format!("{}.", self.list.counter)
        } else {
            self.config.bullet.to_string()
        };
        let content_column = indent + marker.len() + 1;
        self.list.columns.truncate(list.depth);
        self.list.columns.resize(list.depth, indent);
        self.list.columns.push(content_column);

        let pad = " ".repeat(indent);
        self.out.push_str(&pad);
        self.out.push_str(&marker);
        self.out.push(' ');
        match list.checked {
            Some(true) => self.out.push_str("[x] "),
            Some(false) => self.out.push_str("[ ] "),
            None => {}
        }
        let continuation = format!("\n{}", " ".repeat(content_column));
        self.out
            .push_str(&render_inline(children).replace('\n', &continuation));
    }
}

fn render_block(kind: &BlockKind, config: &Config) -> String {
    match kind {
        BlockKind::Heading { level, children } => {
            let level = usize::from((*level).clamp(1, 6));
            let mut text = render_inline(children).replace('\n', " ");
            // A trailing run of `#` would be read as a closing sequence.
            if text.ends_with('#') && !text.ends_with("\\#") {
                text.insert(text.len() - 1, '\\');
            }
            format!("{} {text}", "#".repeat(level))
        }
        BlockKind::Paragraph { children } => render_inline(children),
        BlockKind::Code { language, code } => fenced(language.as_deref().unwrap_or(""), code),
        BlockKind::Diagram { code } => fenced(&config.diagram_language, code),
        BlockKind::Image { src, alt, title } => {
            let mut alt_text = String::new();
            escape_text(alt, &mut alt_text, false);
            format!("![{alt_text}]({}{})", destination(src), title_clause(title))
        }
        BlockKind::Blockquote { children } => render_inline(children)
            .split('\n')
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        BlockKind::ThematicBreak => "---".to_string(),
        BlockKind::Table { align, rows } => render_table(align, rows),
        BlockKind::RawBlock { html } => html.clone(),
        BlockKind::ListItem { .. } | BlockKind::Unsupported => UNSUPPORTED_BLOCK.to_string(),
    }
}

fn fenced(language: &str, code: &str) -> String {
    let fence = "`".repeat(longest_run(code, '`').max(2) + 1);
    format!("{fence}{language}\n{code}\n{fence}")
}

fn longest_run(text: &str, needle: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == needle {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn destination(url: &str) -> String {
    if url.contains(' ') {
        format!("<{url}>")
    } else {
        url.to_string()
    }
}

fn title_clause(title: &Option<String>) -> String {
    match title {
        Some(title) => {
            let mut out = String::from(" \"");
            for c in title.chars() {
                if matches!(c, '\\' | '"' | '&') {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
            out
        }
        None => String::new(),
    }
}

/// Renders inline content as Markdown. Text is escaped so that it re-parses as the
/// same literal text.
pub fn render_inline(elements: &[InlineElement]) -> String {
    let mut out = String::new();
    for element in elements {
        render_inline_into(element, &mut out);
    }
    out
}

/// Backslash-escapes the characters inline parsing would treat as syntax. When
/// `line_starts` is set, anything that would open a block at the start of a line
/// (headings, quotes, list markers, setext underlines) is escaped too.
fn escape_text(value: &str, out: &mut String, line_starts: bool) {
    let mut rest = value;
    let mut at_line_start = line_starts
        && out
            .rsplit('\n')
            .next()
            .is_some_and(|line| line.chars().all(|c| c == ' ' || c == '\t'));
    while let Some(c) = rest.chars().next() {
        if at_line_start {
            let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits > 0 && rest[digits..].starts_with(['.', ')']) {
                out.push_str(&rest[..digits]);
                out.push('\\');
                out.push_str(&rest[digits..digits + 1]);
                rest = &rest[digits + 1..];
                at_line_start = false;
                continue;
            }
            if matches!(c, '#' | '>' | '-' | '+' | '=') {
                out.push('\\');
            }
        }
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '~' | '|' | '&') {
            out.push('\\');
        }
        out.push(c);
        at_line_start = line_starts && (c == '\n' || (at_line_start && matches!(c, ' ' | '\t')));
        rest = &rest[c.len_utf8()..];
    }
}

fn render_inline_into(element: &InlineElement, out: &mut String) {
    match element {
        InlineElement::Text { value } => escape_text(value, out, true),
        InlineElement::Strong { children } => wrap(out, "**", children),
        InlineElement::Emphasis { children } => wrap(out, "*", children),
        InlineElement::Delete { children } => wrap(out, "~~", children),
        InlineElement::InlineCode { value } => {
            let fence = "`".repeat(longest_run(value, '`') + 1);
            let padded = (value.starts_with(['`', ' ']) || value.ends_with(['`', ' ']))
                && !value.chars().all(|c| c == ' ');
            out.push_str(&fence);
            if padded {
                out.push(' ');
            }
            out.push_str(value);
            if padded {
                out.push(' ');
            }
            out.push_str(&fence);
        }
        InlineElement::RawMarkup { value } => out.push_str(value),
        InlineElement::Link {
            url,
            title,
            children,
        } => {
            // `!` directly before the bracket would turn the link into an image.
            if out.ends_with('!') {
                out.insert(out.len() - 1, '\\');
            }
            out.push('[');
            for child in children {
                render_inline_into(child, out);
            }
            out.push_str("](");
            out.push_str(&destination(url));
            out.push_str(&title_clause(title));
            out.push(')');
        }
        InlineElement::Unsupported => out.push_str(UNSUPPORTED_INLINE),
    }
}

fn wrap(out: &mut String, delimiter: &str, children: &[InlineElement]) {
    out.push_str(delimiter);
    for child in children {
        render_inline_into(child, out);
    }
    out.push_str(delimiter);
}

/// Escapes every `|` that is not already behind a backslash, so a cell never splits.
fn escape_pipes(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    let mut escaped = false;
    for c in cell.chars() {
        if c == '|' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out
}

fn render_table(align: &[ColumnAlignment], rows: &[Vec<Vec<InlineElement>>]) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(align.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..columns)
                .map(|col| {
                    row.get(col)
                        .map(|cell| {
                            escape_pipes(&render_inline(cell)).replace('\n', " ")
                        })
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let mut widths = vec![3; columns];
    for row in &cells {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.graphemes(true).count());
        }
    }

    let separator: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(col, width)| {
            let alignment = align.get(col).copied().unwrap_or_default();
            match alignment {
                ColumnAlignment::None => "-".repeat(*width),
                ColumnAlignment::Left => format!(":{}", "-".repeat(width - 1)),
                ColumnAlignment::Center => format!(":{}:", "-".repeat(width - 2)),
                ColumnAlignment::Right => format!("{}:", "-".repeat(width - 1)),
            }
        })
        .collect();

    let header = cells.first().cloned().unwrap_or_else(|| vec![String::new(); columns]);
    let mut lines = vec![table_row(&header, &widths), table_row(&separator, &widths)];
    for row in cells.iter().skip(1) {
        lines.push(table_row(row, &widths));
    }
    lines.join("\n")
}

fn table_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let fill = width.saturating_sub(cell.graphemes(true).count());
            format!("{cell}{}", " ".repeat(fill))
        })
        .collect();
    format!("| {} |", padded.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Block, MarkerStyle};

    fn item(depth: usize, ordered: bool, text: &str) -> Block {
        Block::list_item(depth, ordered, text)
    }

    fn task(depth: usize, checked: bool, text: &str) -> Block {
        Block::new(BlockKind::ListItem {
            children: vec![InlineElement::text(text)],
            list: ListMeta {
                depth,
                ordered: false,
                checked: Some(checked),
                marker: MarkerStyle::Bullet,
            },
        })
    }

    #[test]
    fn test_nested_bullets_use_two_spaces() {
        let blocks = vec![
            item(0, false, "Item 1"),
            item(1, false, "Item 2a"),
            item(1, false, "Item 2b"),
            item(0, false, "Item 3"),
        ];
        assert_eq!(
            serialize(&blocks),
            "- Item 1\n  - Item 2a\n  - Item 2b\n- Item 3"
        );
    }

    #[test]
    fn test_ordered_counter_increments_and_resets() {
        let blocks = vec![
            item(0, true, "A"),
            item(0, true, "B"),
            Block::paragraph("break"),
            item(0, true, "C"),
        ];
        assert_eq!(serialize(&blocks), "1. A\n2. B\n\nbreak\n\n1. C");
    }

    #[test]
    fn test_counter_untouched_on_depth_decrease() {
        let blocks = vec![
            item(0, true, "A"),
            item(0, true, "B"),
            item(1, true, "B1"),
            item(1, true, "B2"),
            item(0, true, "C"),
        ];
        assert_eq!(
            serialize(&blocks),
            "1. A\n2. B\n   1. B1\n   2. B2\n2. C"
        );
    }

    #[test]
    fn test_ordering_change_resets_counter() {
        let blocks = vec![item(0, true, "A"), item(0, false, "b"), item(0, true, "C")];
        assert_eq!(serialize(&blocks), "1. A\n- b\n1. C");
    }

    #[test]
    fn test_child_aligns_with_ordered_parent_content() {
        let mut blocks: Vec<Block> = (1..=10).map(|n| item(0, true, &n.to_string())).collect();
        blocks.push(item(1, false, "child"));
        let output = serialize(&blocks);
        assert!(output.ends_with("10. 10\n    - child"), "got {output}");
    }

    #[test]
    fn test_orphan_falls_back_to_list_indent() {
        let blocks = vec![Block::paragraph("p"), item(2, false, "orphan")];
        assert_eq!(serialize(&blocks), "p\n\n    - orphan");

        let config = Config {
            list_indent: 3,
            ..Config::default()
        };
        assert_eq!(
            serialize_with_config(&blocks, &config),
            "p\n\n      - orphan"
        );
    }

    #[test]
    fn test_checkbox_and_custom_bullet() {
        let blocks = vec![task(0, false, "todo"), task(0, true, "done")];
        assert_eq!(serialize(&blocks), "- [ ] todo\n- [x] done");

        let config = Config {
            bullet: '*',
            ..Config::default()
        };
        assert_eq!(
            serialize_with_config(&blocks, &config),
            "* [ ] todo\n* [x] done"
        );
    }

    #[test]
    fn test_line_break_in_item_is_indented() {
        let blocks = vec![item(0, true, "one\ntwo")];
        assert_eq!(serialize(&blocks), "1. one\n   two");
    }

    #[test]
    fn test_separators_and_no_trailing_newline() {
        let blocks = vec![
            Block::heading(2, "Title"),
            item(0, false, "a"),
            item(0, false, "b"),
            Block::new(BlockKind::ThematicBreak),
        ];
        assert_eq!(serialize(&blocks), "## Title\n\n- a\n- b\n\n---");
        assert_eq!(serialize(&[]), "");
    }

    #[test]
    fn test_heading_flattens_line_breaks() {
        assert_eq!(serialize(&[Block::heading(1, "a\nb")]), "# a b");
    }

    #[test]
    fn test_code_and_diagram_fences() {
        let blocks = vec![
            Block::new(BlockKind::Code {
                language: Some("rust".into()),
                code: "let x = 1;".into(),
            }),
            Block::new(BlockKind::Code {
                language: None,
                code: "has ``` inside".into(),
            }),
            Block::new(BlockKind::Diagram {
                code: "graph TD".into(),
            }),
        ];
        assert_eq!(
            serialize(&blocks),
            "```rust\nlet x = 1;\n```\n\n````\nhas ``` inside\n````\n\n```mermaid\ngraph TD\n```"
        );
    }

    #[test]
    fn test_blockquote_prefixes_every_line() {
        let block = Block::new(BlockKind::Blockquote {
            children: vec![InlineElement::text("one\n\nthree")],
        });
        assert_eq!(serialize(&[block]), "> one\n>\n> three");
    }

    #[test]
    fn test_image_with_and_without_title() {
        let with_title = Block::new(BlockKind::Image {
            src: "a.png".into(),
            alt: "A".into(),
            title: Some("say \"hi\"".into()),
        });
        let without = Block::new(BlockKind::Image {
            src: "b c.png".into(),
            alt: "B".into(),
            title: None,
        });
        assert_eq!(
            serialize(&[with_title, without]),
            "![A](a.png \"say \\\"hi\\\"\")\n\n![B](<b c.png>)"
        );
    }

    #[test]
    fn test_table_alignment_and_padding() {
        let cell = |text: &str| vec![InlineElement::text(text)];
        let block = Block::new(BlockKind::Table {
            align: vec![
                ColumnAlignment::Left,
                ColumnAlignment::None,
                ColumnAlignment::Center,
                ColumnAlignment::Right,
            ],
            rows: vec![
                vec![cell("A"), cell("Long header"), cell("C"), cell("D")],
                vec![cell("1"), cell("a|b"), cell("cafe\u{301}"), vec![]],
            ],
        });
        assert_eq!(
            serialize(&[block]),
            "| A   | Long header | C    | D   |\n\
             | :-- | ----------- | :--: | --: |\n\
             | 1   | a\\|b       | cafe\u{301} |     |"
        );
    }

    #[test]
    fn test_inline_rendering() {
        let elements = vec![
            InlineElement::Strong {
                children: vec![InlineElement::text("b")],
            },
            InlineElement::text(" "),
            InlineElement::Emphasis {
                children: vec![InlineElement::text("i")],
            },
            InlineElement::text(" "),
            InlineElement::Delete {
                children: vec![InlineElement::text("s")],
            },
            InlineElement::text(" "),
            InlineElement::InlineCode {
                value: "a`b".into(),
            },
            InlineElement::text(" "),
            InlineElement::InlineCode { value: "`".into() },
            InlineElement::text(" "),
            InlineElement::Link {
                url: "https://x.test".into(),
                title: Some("X".into()),
                children: vec![InlineElement::text("x")],
            },
            InlineElement::RawMarkup {
                value: "<br>".into(),
            },
            InlineElement::Unsupported,
        ];
        assert_eq!(
            render_inline(&elements),
            "**b** *i* ~~s~~ ``a`b`` `` ` `` [x](https://x.test \"X\")<br><!-- unsupported inline -->"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let text = |value: &str| render_inline(&[InlineElement::text(value)]);
        assert_eq!(
            text("*a* _b_ [c](d) <e> ~f~ g|h &i; \\"),
            "\\*a\\* \\_b\\_ \\[c\\](d) \\<e> \\~f\\~ g\\|h \\&i; \\\\"
        );
        assert_eq!(text("# h"), "\\# h");
        assert_eq!(text("1986. year"), "1986\\. year");
        assert_eq!(text("a\n- b\n  > c\n==="), "a\n\\- b\n  \\> c\n\\===");
        assert_eq!(text("a # b 2. c"), "a # b 2. c");
    }

    #[test]
    fn test_heading_trailing_hash_and_bang_before_link() {
        assert_eq!(serialize(&[Block::heading(1, "C#")]), "# C\\#");
        let elements = vec![
            InlineElement::text("Wow!"),
            InlineElement::Link {
                url: "u".into(),
                title: None,
                children: vec![InlineElement::text("x")],
            },
        ];
        assert_eq!(render_inline(&elements), "Wow\\![x](u)");
    }

    #[test]
    fn test_pipes_escaped_once_in_cells() {
        assert_eq!(escape_pipes("a\\|b"), "a\\|b");
        assert_eq!(escape_pipes("`a|b`"), "`a\\|b`");
        assert_eq!(escape_pipes("a\\\\|b"), "a\\\\\\|b");
    }

    #[test]
    fn test_unsupported_block_placeholder() {
        let blocks = vec![
            Block::paragraph("a"),
            Block::new(BlockKind::Unsupported),
            Block::new(BlockKind::RawBlock {
                html: "<hr class=\"x\">".into(),
            }),
        ];
        assert_eq!(
            serialize(&blocks),
            "a\n\n<!-- unsupported block -->\n\n<hr class=\"x\">"
        );
    }
}
