//! Persistent per-theme color tweaks, stored as a single JSON file.
//!
//! The store is a nested map `theme → group → channel → color`, lazily loaded
//! and eagerly saved: every mutation runs load-modify-save to completion
//! before returning. Empty sub-maps are pruned immediately after removals so
//! "is this group tweaked" stays a plain lookup and the persisted file stays
//! minimal. An absent or malformed file loads as an empty store.

use crate::color::Color;
use crate::error::StoreError;
use crate::registry::{Channel, HighlightSource, Registry};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Nested tweak map as persisted: `theme → group → channel → color`.
pub type TweakMap = BTreeMap<String, BTreeMap<String, BTreeMap<Channel, Color>>>;

/// One tweaked group as listed by the picker's edited mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweakedGroup {
    /// Highlight group name.
    pub name: String,
    /// First tweaked channel in `fg, bg, sp` order, for display.
    pub primary: Channel,
    /// Every tweaked channel with its stored absolute color.
    pub channels: BTreeMap<Channel, Color>,
}

/// File-backed tweak storage with an in-memory cache.
#[derive(Debug)]
pub struct TweakStore {
    /// Backing JSON file.
    path: PathBuf,
    /// Memoized contents; `None` until first load or after invalidation.
    cache: Option<TweakMap>,
}

impl TweakStore {
    /// Create a store over the given backing file. No I/O happens until the
    /// first read or mutation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: None,
        }
    }

    /// Resolved backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the cache so the next access re-reads from disk.
    ///
    /// The active theme is external state that can change underneath the
    /// cache, so theme activation must invalidate before re-applying.
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
    }

    /// Memoized load. An absent file is an empty store; malformed content is
    /// also treated as empty (the file is overwritten wholesale on the next
    /// save), with a warning so the recovery is at least observable.
    fn load(&mut self) -> &mut TweakMap {
        if self.cache.is_none() {
            self.cache = Some(read_tweak_file(&self.path));
        }
        // The branch above guarantees the cache is populated.
        self.cache.as_mut().expect("cache populated by load")
    }

    /// Serialize the whole in-memory store and replace the backing file.
    ///
    /// Failure leaves the in-memory state intact; the next successful save
    /// reconciles the file.
    fn save(&mut self) -> Result<(), StoreError> {
        let map = self.load();
        let json = serde_json::to_vec(map)?;
        let path = &self.path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write to a sibling temporary file first so partial writes do not
        // corrupt the last known-good tweak file.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        // Rename is atomic on most filesystems, making this "all or nothing".
        fs::rename(&tmp_path, path)?;
        tracing::debug!(path = %path.display(), "tweak file saved");
        Ok(())
    }

    /// Record the absolute color for `(theme, group, channel)` and save.
    pub fn set_tweak(
        &mut self,
        theme: &str,
        group: &str,
        channel: Channel,
        color: Color,
    ) -> Result<(), StoreError> {
        self.load()
            .entry(theme.to_string())
            .or_default()
            .entry(group.to_string())
            .or_default()
            .insert(channel, color);
        self.save()
    }

    /// Remove one channel's tweak, pruning empty parents, then save.
    pub fn remove_tweak(
        &mut self,
        theme: &str,
        group: &str,
        channel: Channel,
    ) -> Result<(), StoreError> {
        let map = self.load();
        if let Some(groups) = map.get_mut(theme) {
            if let Some(channels) = groups.get_mut(group) {
                channels.remove(&channel);
            }
        }
        prune(map, theme);
        self.save()
    }

    /// Remove every channel tweak for a group, pruning, then save.
    pub fn remove_group(&mut self, theme: &str, group: &str) -> Result<(), StoreError> {
        let map = self.load();
        if let Some(groups) = map.get_mut(theme) {
            groups.remove(group);
        }
        prune(map, theme);
        self.save()
    }

    /// Remove every tweak for a theme, then save.
    pub fn clear_theme(&mut self, theme: &str) -> Result<(), StoreError> {
        self.load().remove(theme);
        self.save()
    }

    /// True when `(theme, group, channel)` has a stored tweak. Cache only.
    pub fn is_tweaked(&mut self, theme: &str, group: &str, channel: Channel) -> bool {
        self.load()
            .get(theme)
            .and_then(|groups| groups.get(group))
            .is_some_and(|channels| channels.contains_key(&channel))
    }

    /// True when any channel of the group is tweaked. Cache only.
    pub fn is_group_tweaked(&mut self, theme: &str, group: &str) -> bool {
        self.load()
            .get(theme)
            .is_some_and(|groups| groups.contains_key(group))
    }

    /// Stored color for one channel, if any.
    pub fn tweak(&mut self, theme: &str, group: &str, channel: Channel) -> Option<Color> {
        self.load()
            .get(theme)
            .and_then(|groups| groups.get(group))
            .and_then(|channels| channels.get(&channel))
            .copied()
    }

    /// Every tweaked group for a theme, sorted by name.
    pub fn tweaked_groups(&mut self, theme: &str) -> Vec<TweakedGroup> {
        let Some(groups) = self.load().get(theme) else {
            return Vec::new();
        };
        groups
            .iter()
            .filter_map(|(name, channels)| {
                // Pruning keeps channel maps non-empty, but be tolerant of a
                // hand-edited file that violates that.
                let primary = Channel::ALL
                    .into_iter()
                    .find(|channel| channels.contains_key(channel))?;
                Some(TweakedGroup {
                    name: name.clone(),
                    primary,
                    channels: channels.clone(),
                })
            })
            .collect()
    }

    /// Theme names that currently have tweaks, sorted.
    pub fn themes(&mut self) -> Vec<String> {
        self.load().keys().cloned().collect()
    }

    /// Re-apply every stored `(group, channel, color)` for a theme to the
    /// live registry. Used at startup and whenever the active theme changes.
    pub fn apply_tweaks<S: HighlightSource>(&mut self, theme: &str, registry: &mut Registry<S>) {
        let Some(groups) = self.load().get(theme) else {
            return;
        };
        let mut applied = 0usize;
        for (group, channels) in groups.clone() {
            for (channel, color) in channels {
                registry.set_color(&group, channel, color);
                applied += 1;
            }
        }
        tracing::debug!(theme, applied, "re-applied stored tweaks");
    }
}

/// Drop a theme entry whose groups (or a group whose channels) emptied out.
fn prune(map: &mut TweakMap, theme: &str) {
    if let Some(groups) = map.get_mut(theme) {
        groups.retain(|_, channels| !channels.is_empty());
        if groups.is_empty() {
            map.remove(theme);
        }
    }
}

/// Read and parse the tweak file; any failure yields an empty map.
fn read_tweak_file(path: &Path) -> TweakMap {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return TweakMap::new(),
    };
    match serde_json::from_str(&raw) {
        Ok(map) => map,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                %err,
                "tweak file is malformed; treating as empty (next save overwrites it)"
            );
            TweakMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{FakeHighlights, TestTempDir};

    fn color(hex: &str) -> Color {
        Color::parse(hex).unwrap()
    }

    fn store_in(dir: &TestTempDir) -> TweakStore {
        TweakStore::new(dir.child("tweaks.json"))
    }

    #[test]
    fn absent_file_is_an_empty_store() {
        let dir = TestTempDir::new("store-absent");
        let mut store = store_in(&dir);
        assert!(store.themes().is_empty());
        assert!(!store.is_group_tweaked("any", "Normal"));
    }

    #[test]
    fn malformed_file_is_an_empty_store() {
        let dir = TestTempDir::new("store-malformed");
        dir.write_text("tweaks.json", "{not json at all");
        let mut store = store_in(&dir);
        assert!(store.themes().is_empty());
    }

    // Ensures one tweak persists as the compact nested object, byte for byte.
    #[test]
    fn set_tweak_persists_expected_json_shape() {
        let dir = TestTempDir::new("store-shape");
        let mut store = store_in(&dir);
        store
            .set_tweak("demo", "Normal", Channel::Bg, color("#1a1a2e"))
            .unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r##"{"demo":{"Normal":{"bg":"#1a1a2e"}}}"##);
    }

    #[test]
    fn tweaks_survive_a_fresh_store_instance() {
        let dir = TestTempDir::new("store-reload");
        let path = dir.child("tweaks.json");
        TweakStore::new(&path)
            .set_tweak("demo", "Comment", Channel::Fg, color("#7c7c9c"))
            .unwrap();

        let mut reopened = TweakStore::new(&path);
        assert_eq!(
            reopened.tweak("demo", "Comment", Channel::Fg),
            Some(color("#7c7c9c"))
        );
    }

    // Ensures removing a group's last channel prunes the group and the theme.
    #[test]
    fn removal_prunes_empty_parents() {
        let dir = TestTempDir::new("store-prune");
        let mut store = store_in(&dir);
        store
            .set_tweak("demo", "Normal", Channel::Bg, color("#1a1a2e"))
            .unwrap();
        store.remove_tweak("demo", "Normal", Channel::Bg).unwrap();

        assert!(!store.is_group_tweaked("demo", "Normal"));
        assert!(store.themes().is_empty());
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("Normal"));
        assert_eq!(raw, "{}");
    }

    #[test]
    fn clear_theme_leaves_other_themes_alone() {
        let dir = TestTempDir::new("store-clear");
        let mut store = store_in(&dir);
        store
            .set_tweak("day", "Normal", Channel::Bg, color("#fafafa"))
            .unwrap();
        store
            .set_tweak("night", "Normal", Channel::Bg, color("#101018"))
            .unwrap();
        store.clear_theme("night").unwrap();

        assert!(store.tweaked_groups("night").is_empty());
        assert_eq!(store.themes(), vec!["day".to_string()]);

        // Clearing an already-clear theme is a harmless no-op.
        store.clear_theme("night").unwrap();
        assert_eq!(store.themes(), vec!["day".to_string()]);
    }

    #[test]
    fn tweaked_groups_are_sorted_with_primary_channel() {
        let dir = TestTempDir::new("store-groups");
        let mut store = store_in(&dir);
        store
            .set_tweak("demo", "String", Channel::Fg, color("#a0e080"))
            .unwrap();
        store
            .set_tweak("demo", "Normal", Channel::Sp, color("#ff0000"))
            .unwrap();
        store
            .set_tweak("demo", "Normal", Channel::Bg, color("#1a1a2e"))
            .unwrap();

        let groups = store.tweaked_groups("demo");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Normal");
        assert_eq!(groups[0].primary, Channel::Bg);
        assert_eq!(groups[0].channels.len(), 2);
        assert_eq!(groups[1].name, "String");
        assert_eq!(groups[1].primary, Channel::Fg);
    }

    // Ensures apply_tweaks writes every stored color through the registry.
    #[test]
    fn apply_tweaks_writes_through_registry() {
        let dir = TestTempDir::new("store-apply");
        let mut store = store_in(&dir);
        store
            .set_tweak("demo", "Normal", Channel::Bg, color("#1a1a2e"))
            .unwrap();
        store
            .set_tweak("demo", "Comment", Channel::Fg, color("#7c7c9c"))
            .unwrap();

        let mut registry = Registry::new(FakeHighlights::default());
        store.apply_tweaks("demo", &mut registry);
        assert_eq!(registry.color("Normal", Channel::Bg), Some(color("#1a1a2e")));
        assert_eq!(registry.color("Comment", Channel::Fg), Some(color("#7c7c9c")));
    }

    // Ensures invalidation picks up external changes to the backing file.
    #[test]
    fn invalidate_cache_rereads_from_disk() {
        let dir = TestTempDir::new("store-invalidate");
        let path = dir.child("tweaks.json");
        let mut store = TweakStore::new(&path);
        assert!(store.themes().is_empty());

        // Another writer replaces the file underneath the cache.
        dir.write_text("tweaks.json", r##"{"demo":{"Normal":{"bg":"#1a1a2e"}}}"##);
        assert!(store.themes().is_empty(), "cache must mask the change");

        store.invalidate_cache();
        assert_eq!(store.themes(), vec!["demo".to_string()]);
    }
}
