//! Tab strip: the ordered list of open documents

use serde::{Deserialize, Serialize};

/// Stable identity of a tab inside one [`TabStrip`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(u64);

/// Serializable tab, as stored in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabEntry {
    pub title: String,
    #[serde(default)]
    pub active: bool,
}

/// An open handle on a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    /// Name of the document this tab shows
    pub title: String,
    /// Maintained by the strip; at most one tab is active
    pub active: bool,
}

/// Result of closing a tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedTab {
    pub title: String,
    pub was_active: bool,
    /// The sibling that took over activation, if the closed tab was active
    pub activated: Option<TabId>,
}

/// Ordered tabs; the "new tab" control always sits after the last one
#[derive(Debug, Clone, Default)]
pub struct TabStrip {
    tabs: Vec<Tab>,
    next_id: u64,
}

impl TabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore tabs from the configuration; only the first active entry stays active
    pub fn from_entries(entries: &[TabEntry]) -> Self {
        let mut strip = Self::new();
        let mut active = None;
        for entry in entries {
            let id = strip.create(&entry.title);
            if entry.active && active.is_none() {
                active = Some(id);
            }
        }
        if let Some(id) = active {
            strip.activate(id);
        }
        strip
    }

    /// Current tabs, for writing back to the configuration
    pub fn to_entries(&self) -> Vec<TabEntry> {
        self.tabs
            .iter()
            .map(|t| TabEntry {
                title: t.title.clone(),
                active: t.active,
            })
            .collect()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn active(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.active)
    }

    /// First tab, in strip order, titled `title`
    pub fn find_by_title(&self, title: &str) -> Option<TabId> {
        self.tabs.iter().find(|t| t.title == title).map(|t| t.id)
    }

    /// Append a tab without activating it
    pub fn create(&mut self, title: &str) -> TabId {
        self.next_id += 1;
        let id = TabId(self.next_id);
        self.tabs.push(Tab {
            id,
            title: title.to_string(),
            active: false,
        });
        tracing::debug!("Created tab {}", title);
        id
    }

    /// Make `id` the only active tab; returns its title
    pub fn activate(&mut self, id: TabId) -> Option<&str> {
        if self.get(id).is_none() {
            tracing::warn!("Ignoring activation of unknown tab {:?}", id);
            return None;
        }
        for tab in &mut self.tabs {
            tab.active = tab.id == id;
        }
        self.get(id).map(|t| t.title.as_str())
    }

    /// Remove a tab; an active tab hands activation to its previous sibling,
    /// or the next one when it was first.
    pub fn close(&mut self, id: TabId) -> Option<ClosedTab> {
        let index = self.tabs.iter().position(|t| t.id == id)?;
        let closed = self.tabs.remove(index);

        let activated = if closed.active && !self.tabs.is_empty() {
            let neighbor = self.tabs[index.saturating_sub(1).min(self.tabs.len() - 1)].id;
            self.activate(neighbor);
            Some(neighbor)
        } else {
            None
        };

        Some(ClosedTab {
            title: closed.title,
            was_active: closed.active,
            activated,
        })
    }

    /// Retitle the active tab
    pub fn rename_active(&mut self, title: &str) {
        if let Some(tab) = self.tabs.iter_mut().find(|t| t.active) {
            if tab.title != title {
                tab.title = title.to_string();
            }
        }
    }

    /// Smallest `"{prefix} N"` (N >= 1) not used by any tab
    pub fn next_untitled_title(&self, prefix: &str) -> String {
        (1..)
            .map(|n| format!("{} {}", prefix, n))
            .find(|title| self.find_by_title(title).is_none())
            .unwrap_or_else(|| prefix.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(titles: &[&str]) -> (TabStrip, Vec<TabId>) {
        let mut strip = TabStrip::new();
        let ids = titles.iter().map(|t| strip.create(t)).collect();
        (strip, ids)
    }

    fn active_count(strip: &TabStrip) -> usize {
        strip.tabs().iter().filter(|t| t.active).count()
    }

    #[test]
    fn test_create_does_not_steal_focus() {
        let (mut strip, ids) = strip(&["A"]);
        strip.activate(ids[0]);
        strip.create("B");
        assert_eq!(strip.active().unwrap().title, "A");
        assert_eq!(strip.tabs().last().unwrap().title, "B");
    }

    #[test]
    fn test_activate_is_exclusive() {
        let (mut strip, ids) = strip(&["A", "B", "C"]);
        assert_eq!(strip.activate(ids[0]), Some("A"));
        assert_eq!(strip.activate(ids[2]), Some("C"));
        assert_eq!(active_count(&strip), 1);
        assert_eq!(strip.active().unwrap().id, ids[2]);
    }

    #[test]
    fn test_find_by_title_returns_first() {
        let (strip, ids) = strip(&["A", "Dup", "Dup"]);
        assert_eq!(strip.find_by_title("Dup"), Some(ids[1]));
        assert_eq!(strip.find_by_title("missing"), None);
    }

    #[test]
    fn test_close_active_prefers_previous() {
        let (mut strip, ids) = strip(&["A", "B", "C"]);
        strip.activate(ids[1]);
        let closed = strip.close(ids[1]).unwrap();
        assert!(closed.was_active);
        assert_eq!(closed.activated, Some(ids[0]));
        assert_eq!(strip.active().unwrap().title, "A");
    }

    #[test]
    fn test_close_first_active_falls_to_next() {
        let (mut strip, ids) = strip(&["A", "B", "C"]);
        strip.activate(ids[0]);
        let closed = strip.close(ids[0]).unwrap();
        assert_eq!(closed.activated, Some(ids[1]));
        assert_eq!(strip.active().unwrap().title, "B");
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let (mut strip, ids) = strip(&["A", "B"]);
        strip.activate(ids[0]);
        let closed = strip.close(ids[1]).unwrap();
        assert!(!closed.was_active);
        assert_eq!(closed.activated, None);
        assert_eq!(strip.active().unwrap().title, "A");
    }

    #[test]
    fn test_close_last_leaves_nothing_active() {
        let (mut strip, ids) = strip(&["A"]);
        strip.activate(ids[0]);
        let closed = strip.close(ids[0]).unwrap();
        assert_eq!(closed.activated, None);
        assert!(strip.is_empty());
        assert!(strip.active().is_none());
        assert_eq!(strip.close(ids[0]), None);
    }

    #[test]
    fn test_next_untitled_fills_gaps() {
        let (strip, _) = strip(&["Untitled 1", "Untitled 3"]);
        assert_eq!(strip.next_untitled_title("Untitled"), "Untitled 2");
        assert_eq!(TabStrip::new().next_untitled_title("Untitled"), "Untitled 1");
    }

    #[test]
    fn test_from_entries_restores_active() {
        let strip = TabStrip::from_entries(&[
            TabEntry { title: "A".into(), active: false },
            TabEntry { title: "B".into(), active: true },
            TabEntry { title: "C".into(), active: true },
        ]);
        assert_eq!(strip.len(), 3);
        assert_eq!(active_count(&strip), 1);
        assert_eq!(strip.active().unwrap().title, "B");
    }

    #[test]
    fn test_rename_active() {
        let (mut strip, ids) = strip(&["A", "B"]);
        strip.activate(ids[1]);
        strip.rename_active("Renamed");
        assert_eq!(strip.get(ids[1]).unwrap().title, "Renamed");
        assert_eq!(strip.get(ids[0]).unwrap().title, "A");
    }
}
