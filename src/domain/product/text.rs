// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/product/text.rs
//
// Description editing: the narrow editor interface and toolbar markup.

/// What the form needs from an embedded text editor.
pub trait TextEditing {
    /// Current content as an HTML fragment.
    fn value(&self) -> String;

    /// Replace the whole content.
    fn set_value(&mut self, value: &str);
}

/// Toolbar formats. Each wraps the selected text in HTML tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    Heading1,
    Heading2,
    OrderedList,
    BulletList,
    Bold,
    Italic,
    Underline,
    Link,
    Blockquote,
}

impl Markup {
    pub const ALL: [Markup; 9] = [
        Markup::Heading1,
        Markup::Heading2,
        Markup::OrderedList,
        Markup::BulletList,
        Markup::Bold,
        Markup::Italic,
        Markup::Underline,
        Markup::Link,
        Markup::Blockquote,
    ];

    /// Short toolbar label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Heading1 => "H1",
            Self::Heading2 => "H2",
            Self::OrderedList => "1.",
            Self::BulletList => "•",
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Underline => "U",
            Self::Link => "Link",
            Self::Blockquote => "❝",
        }
    }

    /// Wrap `selection` in this format's markup.
    ///
    /// List formats turn every selected line into an item.
    pub fn wrap(self, selection: &str) -> String {
        match self {
            Self::Heading1 => format!("<h1>{selection}</h1>"),
            Self::Heading2 => format!("<h2>{selection}</h2>"),
            Self::OrderedList => format!("<ol>{}</ol>", list_items(selection)),
            Self::BulletList => format!("<ul>{}</ul>", list_items(selection)),
            Self::Bold => format!("<strong>{selection}</strong>"),
            Self::Italic => format!("<em>{selection}</em>"),
            Self::Underline => format!("<u>{selection}</u>"),
            Self::Link => format!("<a href=\"{}\">{selection}</a>", selection.trim()),
            Self::Blockquote => format!("<blockquote>{selection}</blockquote>"),
        }
    }
}

fn list_items(selection: &str) -> String {
    let lines: Vec<&str> = selection.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.is_empty() {
        return "<li></li>".to_string();
    }
    lines.iter().map(|line| format!("<li>{line}</li>")).collect()
}
