//! Inline content model.
//!
//! Inline elements form a finite tree: container variants own their children, leaf
//! variants carry a string value. The set is closed; anything the parser does not
//! recognize is dropped before it gets here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InlineElement {
    Text {
        value: String,
    },
    Strong {
        children: Vec<InlineElement>,
    },
    Emphasis {
        children: Vec<InlineElement>,
    },
    Delete {
        children: Vec<InlineElement>,
    },
    InlineCode {
        value: String,
    },
    RawMarkup {
        value: String,
    },
    Link {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<InlineElement>,
    },
    /// Unknown `type` tag coming in through JSON.
    #[serde(other)]
    Unsupported,
}

impl InlineElement {
    pub fn text(value: impl Into<String>) -> Self {
        InlineElement::Text {
            value: value.into(),
        }
    }

    pub fn children(&self) -> Option<&[InlineElement]> {
        match self {
            InlineElement::Strong { children }
            | InlineElement::Emphasis { children }
            | InlineElement::Delete { children }
            | InlineElement::Link { children, .. } => Some(children),
            InlineElement::Text { .. }
            | InlineElement::InlineCode { .. }
            | InlineElement::RawMarkup { .. }
            | InlineElement::Unsupported => None,
        }
    }

    /// Text as a reader sees it, without markup.
    pub fn plain_text(&self) -> String {
        match self {
            InlineElement::Text { value } | InlineElement::InlineCode { value } => value.clone(),
            InlineElement::RawMarkup { .. } | InlineElement::Unsupported => String::new(),
            InlineElement::Strong { children }
            | InlineElement::Emphasis { children }
            | InlineElement::Delete { children }
            | InlineElement::Link { children, .. } => plain_text(children),
        }
    }
}

pub fn plain_text(elements: &[InlineElement]) -> String {
    elements.iter().map(InlineElement::plain_text).collect()
}

/// Merges adjacent text leaves and drops empty ones, recursively.
///
/// The source tree splits text at arbitrary points (brackets, breaks), so without
/// this the same Markdown could produce differently shaped sequences.
pub fn coalesce(elements: Vec<InlineElement>) -> Vec<InlineElement> {
    let mut out: Vec<InlineElement> = Vec::with_capacity(elements.len());
    for element in elements {
        let element = match element {
            InlineElement::Strong { children } => InlineElement::Strong {
                children: coalesce(children),
            },
            InlineElement::Emphasis { children } => InlineElement::Emphasis {
                children: coalesce(children),
            },
            InlineElement::Delete { children } => InlineElement::Delete {
                children: coalesce(children),
            },
            InlineElement::Link {
                url,
                title,
                children,
            } => InlineElement::Link {
                url,
                title,
                children: coalesce(children),
            },
            InlineElement::Text { value } => {
                if value.is_empty() {
                    continue;
                }
                if let Some(InlineElement::Text { value: previous }) = out.last_mut() {
                    previous.push_str(&value);
                    continue;
                }
                InlineElement::Text { value }
            }
            other => other,
        };
        out.push(element);
    }
    out
}
