//! Formatting commands, keyboard shortcuts, counters and plain-text export

use std::fmt;
use std::str::FromStr;

use pulldown_cmark::{Event, Parser, TagEnd};
use thiserror::Error;

/// The closed set of editing-surface commands, invoked by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Undo,
    Redo,
}

/// Returned when a command name is not one of [`FormatCommand::ALL`]
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown formatting command: {0}")]
pub struct UnknownCommand(pub String);

impl FormatCommand {
    /// Every command, in toolbar order
    pub const ALL: [FormatCommand; 5] = [
        FormatCommand::Bold,
        FormatCommand::Italic,
        FormatCommand::Underline,
        FormatCommand::Undo,
        FormatCommand::Redo,
    ];

    /// Command name as used by the toolbar
    pub fn name(self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::Undo => "undo",
            FormatCommand::Redo => "redo",
        }
    }

    /// Markup placed around the selection, `None` for history commands
    pub fn markers(self) -> Option<(&'static str, &'static str)> {
        match self {
            FormatCommand::Bold => Some(("**", "**")),
            FormatCommand::Italic => Some(("*", "*")),
            FormatCommand::Underline => Some(("<u>", "</u>")),
            FormatCommand::Undo | FormatCommand::Redo => None,
        }
    }
}

impl fmt::Display for FormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// Resolve a key chord to a formatting command.
///
/// Only Ctrl/Cmd + B, I or U are recognized; anything else is ignored.
pub fn resolve_shortcut(modifier_held: bool, key: char) -> Option<FormatCommand> {
    if !modifier_held {
        return None;
    }
    match key.to_ascii_lowercase() {
        'b' => Some(FormatCommand::Bold),
        'i' => Some(FormatCommand::Italic),
        'u' => Some(FormatCommand::Underline),
        _ => None,
    }
}

/// Word and character counts shown in the status bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCounts {
    /// Maximal runs of non-whitespace
    pub words: usize,
    /// Non-whitespace characters
    pub chars: usize,
}

impl TextCounts {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            chars: text.chars().filter(|c| !c.is_whitespace()).count(),
        }
    }
}

/// Strip markup, keeping the readable text with block boundaries as line breaks
pub fn plain_text(markup: &str) -> String {
    let mut out = String::new();

    for event in Parser::new(markup) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock) => {
                out.push_str("\n\n")
            }
            Event::End(TagEnd::Item) => out.push('\n'),
            // Inline tags such as <u> carry no text of their own
            _ => {}
        }
    }

    out.trim_end().to_string()
}

/// A downloadable plain-text rendition of the current document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub text: String,
}

impl ExportArtifact {
    pub fn new(document_name: Option<&str>, markup: &str) -> Self {
        let stem = document_name.filter(|n| !n.is_empty()).unwrap_or("document");
        Self {
            file_name: format!("{}.txt", stem),
            text: plain_text(markup),
        }
    }
}
