//! Shared test fixtures for store/picker test modules.
//!
//! Keeping tiny but reusable helpers here prevents each test module from
//! rebuilding ad-hoc temp-dir and fake-host code.

use crate::color::Color;
use crate::host::{CursorGroup, HostEnv, NoticeLevel};
use crate::registry::{Channel, ChannelColors, HighlightDef, HighlightSource};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
///
/// This helper is intentionally simple and std-only so unit tests can use it
/// without introducing new dependencies.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("retint-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    /// Root directory path for this fixture.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// In-memory [`HighlightSource`] seeded from a builder-style API.
#[derive(Debug, Default)]
pub struct FakeHighlights {
    groups: BTreeMap<String, HighlightDef>,
}

impl FakeHighlights {
    /// Add a direct group with the given channel colors.
    pub fn with_direct(mut self, name: &str, colors: ChannelColors) -> Self {
        self.groups.insert(name.into(), HighlightDef::Direct(colors));
        self
    }

    /// Add a direct group with only a foreground color.
    pub fn with_fg(self, name: &str, hex: &str) -> Self {
        self.with_direct(
            name,
            ChannelColors {
                fg: Some(Color::parse(hex).expect("fixture hex")),
                ..Default::default()
            },
        )
    }

    /// Add a direct group with only a background color.
    pub fn with_bg(self, name: &str, hex: &str) -> Self {
        self.with_direct(
            name,
            ChannelColors {
                bg: Some(Color::parse(hex).expect("fixture hex")),
                ..Default::default()
            },
        )
    }

    /// Add a link group pointing at `target`.
    pub fn with_link(mut self, name: &str, target: &str) -> Self {
        self.groups.insert(
            name.into(),
            HighlightDef::Link {
                target: target.into(),
            },
        );
        self
    }
}

impl HighlightSource for FakeHighlights {
    fn get(&self, group: &str) -> Option<HighlightDef> {
        self.groups.get(group).cloned()
    }

    fn set_color(&mut self, group: &str, channel: Channel, color: Color) {
        let entry = self
            .groups
            .entry(group.to_string())
            .or_insert(HighlightDef::Direct(ChannelColors::default()));
        if let HighlightDef::Direct(colors) = entry {
            colors.set(channel, color);
        }
    }

    fn all_groups(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }
}

/// Scriptable [`HostEnv`] that records notices and reload calls.
#[derive(Debug)]
pub struct FakeHost {
    /// Theme name returned by `active_theme`.
    pub theme: String,
    /// Current clipboard register contents.
    pub clipboard: Option<String>,
    /// Next prompt answer; `None` simulates cancellation.
    pub prompt_answer: Option<String>,
    /// Groups reported at the cursor.
    pub cursor_groups: Vec<CursorGroup>,
    /// Recorded `(level, message)` notices.
    pub notices: Vec<(NoticeLevel, String)>,
    /// Themes passed to `reload_theme`, in call order.
    pub reloads: Vec<String>,
}

impl FakeHost {
    pub fn new(theme: &str) -> Self {
        Self {
            theme: theme.to_string(),
            clipboard: None,
            prompt_answer: None,
            cursor_groups: Vec::new(),
            notices: Vec::new(),
            reloads: Vec::new(),
        }
    }

    /// Messages recorded at the given level.
    pub fn notices_at(&self, level: NoticeLevel) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

impl HostEnv for FakeHost {
    fn active_theme(&self) -> String {
        self.theme.clone()
    }

    fn reload_theme(&mut self, theme: &str) {
        self.reloads.push(theme.to_string());
    }

    fn clipboard_get(&mut self) -> Option<String> {
        self.clipboard.clone()
    }

    fn clipboard_set(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }

    fn prompt(&mut self, _label: &str, _default: &str) -> Option<String> {
        self.prompt_answer.clone()
    }

    fn groups_at_cursor(&mut self) -> Vec<CursorGroup> {
        self.cursor_groups.clone()
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
    }

    #[test]
    fn fake_highlights_builder_round_trips() {
        let source = FakeHighlights::default()
            .with_fg("Comment", "#7c7c9c")
            .with_link("@comment", "Comment");
        assert!(matches!(
            source.get("@comment"),
            Some(HighlightDef::Link { .. })
        ));
        assert_eq!(source.all_groups().len(), 2);
    }
}
