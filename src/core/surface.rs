//! The editing surface: the text buffer the user types into

use std::ops::Range;

use super::format::FormatCommand;

/// Maximum undo snapshots kept per document
const HISTORY_LIMIT: usize = 200;

/// Host editing surface driven by the session
pub trait EditingSurface {
    /// Hydrate with stored content, format preserved; resets history
    fn set_content(&mut self, content: &str);

    /// Serialize the current state
    fn content(&self) -> String;

    /// Apply a user edit
    fn replace(&mut self, content: String);

    /// Track the user's selection, in character offsets
    fn set_selection(&mut self, selection: Range<usize>);

    /// Run a formatting command; returns whether the content changed
    fn exec(&mut self, command: FormatCommand) -> bool;
}

/// Plain `String` surface holding lightweight markup
#[derive(Debug, Clone, Default)]
pub struct TextSurface {
    text: String,
    selection: Range<usize>,
    undo: Vec<String>,
    redo: Vec<String>,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn clamp_selection(&mut self) {
        let len = self.char_count();
        let end = self.selection.end.min(len);
        let start = self.selection.start.min(end);
        self.selection = start..end;
    }

    fn record(&mut self) {
        self.undo.push(self.text.clone());
        if self.undo.len() > HISTORY_LIMIT {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    fn wrap_selection(&mut self, open: &str, close: &str) {
        self.record();

        let start = self.byte_offset(self.selection.start);
        let end = self.byte_offset(self.selection.end);
        let mut wrapped = String::with_capacity(self.text.len() + open.len() + close.len());
        wrapped.push_str(&self.text[..start]);
        wrapped.push_str(open);
        wrapped.push_str(&self.text[start..end]);
        wrapped.push_str(close);
        wrapped.push_str(&self.text[end..]);
        self.text = wrapped;

        // Keep the same characters selected, now inside the markers
        let shift = open.chars().count();
        self.selection = (self.selection.start + shift)..(self.selection.end + shift);
    }

    fn step_history(&mut self, undo: bool) -> bool {
        let (from, to) = if undo {
            (&mut self.undo, &mut self.redo)
        } else {
            (&mut self.redo, &mut self.undo)
        };
        let Some(snapshot) = from.pop() else {
            return false;
        };
        to.push(std::mem::replace(&mut self.text, snapshot));
        self.clamp_selection();
        true
    }
}

impl EditingSurface for TextSurface {
    fn set_content(&mut self, content: &str) {
        self.text = content.to_string();
        self.undo.clear();
        self.redo.clear();
        let len = self.char_count();
        self.selection = len..len;
    }

    fn content(&self) -> String {
        self.text.clone()
    }

    fn replace(&mut self, content: String) {
        if content == self.text {
            return;
        }
        self.record();
        self.text = content;
        self.clamp_selection();
    }

    fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = selection;
        self.clamp_selection();
    }

    fn exec(&mut self, command: FormatCommand) -> bool {
        match command {
            FormatCommand::Undo => self.step_history(true),
            FormatCommand::Redo => self.step_history(false),
            _ => match command.markers() {
                Some((open, close)) => {
                    self.wrap_selection(open, close);
                    true
                }
                None => false,
            },
        }
    }
}
