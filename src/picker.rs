//! Picker state machine: selection, channel targeting, search, and undo.
//!
//! The picker owns the per-session state (mode, item list, selection index,
//! per-group active channel, browse search text) and mediates user intents
//! into color-engine math, registry writes, and store persistence. It is
//! strictly single-threaded: one intent runs to completion before the next.

use crate::color::Color;
use crate::filter::filter_groups;
use crate::host::{HostEnv, NoticeLevel};
use crate::registry::{categories, Channel, HighlightSource, Registry};
use crate::store::TweakStore;
use std::collections::BTreeMap;

/// Display mode of an open picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Curated category table, flattened.
    Categories,
    /// Groups found at the host cursor position.
    Cursor,
    /// Every registry group, fuzzy-searchable.
    Browse,
    /// Groups with stored tweaks for the active theme.
    Edited,
}

/// One selectable row in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Highlight group name.
    pub group: String,
    /// Display-only channel hint; never restricts editing.
    pub preferred: Option<Channel>,
}

impl Item {
    fn plain(group: String) -> Self {
        Self {
            group,
            preferred: None,
        }
    }
}

/// Relative adjustment sizes used by the step-wise intents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustSteps {
    /// Hue step in degrees.
    pub hue: f32,
    /// Lightness step as a fraction of `[0, 1]`.
    pub lightness: f32,
    /// Saturation step as a fraction of `[0, 1]`.
    pub saturation: f32,
}

impl Default for AdjustSteps {
    fn default() -> Self {
        Self {
            hue: 5.0,
            lightness: 0.02,
            saturation: 0.02,
        }
    }
}

/// Browse-mode search state: the live query and the unfiltered snapshot it
/// always filters from (filtering is never compounded).
#[derive(Debug)]
struct SearchState {
    query: String,
    snapshot: Vec<String>,
}

/// Per-open state, dropped wholesale on close.
#[derive(Debug)]
struct Session {
    mode: Mode,
    items: Vec<Item>,
    /// 0-based; display surfaces are 1-based.
    selected: usize,
    /// Lazily seeded "active channel" memory, one entry per touched group.
    active_channel: BTreeMap<String, Channel>,
    search: Option<SearchState>,
}

/// The picker core, generic over the host editor seams.
#[derive(Debug)]
pub struct Picker<H: HostEnv, S: HighlightSource> {
    host: H,
    registry: Registry<S>,
    store: TweakStore,
    steps: AdjustSteps,
    session: Option<Session>,
}

impl<H: HostEnv, S: HighlightSource> Picker<H, S> {
    pub fn new(host: H, source: S, store: TweakStore, steps: AdjustSteps) -> Self {
        Self {
            host,
            registry: Registry::new(source),
            store,
            steps,
            session: None,
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.session.as_ref().map(|s| s.mode)
    }

    /// Current item list; empty when closed.
    pub fn items(&self) -> &[Item] {
        self.session.as_ref().map_or(&[], |s| s.items.as_slice())
    }

    /// Currently selected item, if the picker is open and non-empty.
    pub fn selected(&self) -> Option<&Item> {
        let session = self.session.as_ref()?;
        session.items.get(session.selected)
    }

    /// 1-based selection position for display surfaces.
    pub fn selected_position(&self) -> Option<usize> {
        let session = self.session.as_ref()?;
        if session.items.is_empty() {
            None
        } else {
            Some(session.selected + 1)
        }
    }

    /// Live browse query, when in browse mode.
    pub fn search_query(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|s| s.search.as_ref())
            .map(|search| search.query.as_str())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    pub fn store_mut(&mut self) -> &mut TweakStore {
        &mut self.store
    }

    // -- open / close -------------------------------------------------------

    /// Open the curated category view.
    pub fn open_categories(&mut self) {
        let items: Vec<Item> = categories()
            .iter()
            .flat_map(|category| category.entries.iter())
            .map(|(group, preferred)| Item {
                group: (*group).to_string(),
                preferred: Some(*preferred),
            })
            .collect();
        self.open_with(Mode::Categories, items, None);
    }

    /// Open on the highlight groups under the host cursor.
    pub fn open_cursor(&mut self) {
        // Any open intent ends the previous session, even when the new mode
        // has nothing to show.
        self.close();
        let items: Vec<Item> = self
            .host
            .groups_at_cursor()
            .into_iter()
            .map(|cursor_group| Item::plain(cursor_group.name))
            .collect();
        if items.is_empty() {
            self.host
                .notify(NoticeLevel::Info, "no highlight groups at cursor");
            return;
        }
        self.open_with(Mode::Cursor, items, None);
    }

    /// Open the full searchable group list.
    pub fn open_browse(&mut self) {
        let snapshot = self.registry.all_groups();
        let items = snapshot.iter().cloned().map(Item::plain).collect();
        self.open_with(
            Mode::Browse,
            items,
            Some(SearchState {
                query: String::new(),
                snapshot,
            }),
        );
    }

    /// Open on the groups tweaked for the active theme.
    pub fn open_edited(&mut self) {
        // Any open intent ends the previous session, even when the new mode
        // has nothing to show.
        self.close();
        let theme = self.host.active_theme();
        let items: Vec<Item> = self
            .store
            .tweaked_groups(&theme)
            .into_iter()
            .map(|tweaked| Item {
                group: tweaked.name,
                preferred: Some(tweaked.primary),
            })
            .collect();
        if items.is_empty() {
            self.host.notify(
                NoticeLevel::Info,
                &format!("no tweaked groups for theme {theme}"),
            );
            return;
        }
        self.open_with(Mode::Edited, items, None);
    }

    fn open_with(&mut self, mode: Mode, items: Vec<Item>, search: Option<SearchState>) {
        // Opening a new mode tears down any active session first.
        self.close();
        tracing::debug!(?mode, count = items.len(), "picker opened");
        self.session = Some(Session {
            mode,
            items,
            selected: 0,
            active_channel: BTreeMap::new(),
            search,
        });
    }

    /// Close the picker, releasing all per-session state. Idempotent.
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("picker closed");
        }
    }

    // -- selection ----------------------------------------------------------

    /// Move the selection down, wrapping past the end.
    pub fn select_next(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if !session.items.is_empty() {
                session.selected = (session.selected + 1) % session.items.len();
            }
        }
    }

    /// Move the selection up, wrapping past the start.
    pub fn select_prev(&mut self) {
        if let Some(session) = self.session.as_mut() {
            let len = session.items.len();
            if len > 0 {
                session.selected = (session.selected + len - 1) % len;
            }
        }
    }

    // -- channel targeting --------------------------------------------------

    /// The selected group's active channel, lazily seeded from the first
    /// available channel. `None` when nothing is selected or the group has
    /// no color channels at all.
    pub fn active_channel(&mut self) -> Option<Channel> {
        let group = self.selected()?.group.clone();
        self.channel_for(&group)
    }

    fn channel_for(&mut self, group: &str) -> Option<Channel> {
        let session = self.session.as_mut()?;
        if let Some(channel) = session.active_channel.get(group) {
            return Some(*channel);
        }
        let first = self.registry.available_channels(group).into_iter().next()?;
        self.session
            .as_mut()
            .expect("session checked above")
            .active_channel
            .insert(group.to_string(), first);
        Some(first)
    }

    /// Rotate the selected group's active channel forward.
    pub fn cycle_channel_next(&mut self) {
        self.cycle_channel(1);
    }

    /// Rotate the selected group's active channel backward.
    pub fn cycle_channel_prev(&mut self) {
        self.cycle_channel(-1);
    }

    fn cycle_channel(&mut self, direction: isize) {
        let Some(item) = self.selected() else {
            return;
        };
        let group = item.group.clone();
        let channels = self.registry.available_channels(&group);
        // A group with zero or one channel has nothing to cycle through.
        if channels.len() <= 1 {
            return;
        }
        let Some(current) = self.channel_for(&group) else {
            return;
        };
        let len = channels.len() as isize;
        let pos = channels
            .iter()
            .position(|c| *c == current)
            .unwrap_or(0) as isize;
        let next = ((pos + direction % len + len) % len) as usize;
        if let Some(session) = self.session.as_mut() {
            session.active_channel.insert(group, channels[next]);
        }
    }

    // -- color intents ------------------------------------------------------

    /// Shift the active channel's hue by `delta` degrees.
    pub fn adjust_hue(&mut self, delta: f32) {
        self.adjust_with(|color| color.adjust_hue(delta));
    }

    /// Shift the active channel's lightness by `delta`.
    pub fn adjust_lightness(&mut self, delta: f32) {
        self.adjust_with(|color| color.adjust_lightness(delta));
    }

    /// Shift the active channel's saturation by `delta`.
    pub fn adjust_saturation(&mut self, delta: f32) {
        self.adjust_with(|color| color.adjust_saturation(delta));
    }

    /// Step-wise variants using the configured step sizes.
    pub fn hue_up(&mut self) {
        self.adjust_hue(self.steps.hue);
    }

    pub fn hue_down(&mut self) {
        self.adjust_hue(-self.steps.hue);
    }

    pub fn lighten(&mut self) {
        self.adjust_lightness(self.steps.lightness);
    }

    pub fn darken(&mut self) {
        self.adjust_lightness(-self.steps.lightness);
    }

    pub fn saturate(&mut self) {
        self.adjust_saturation(self.steps.saturation);
    }

    pub fn desaturate(&mut self) {
        self.adjust_saturation(-self.steps.saturation);
    }

    fn adjust_with(&mut self, op: impl Fn(Color) -> Color) {
        let Some((group, channel)) = self.target() else {
            return;
        };
        let Some(current) = self.registry.color(&group, channel) else {
            self.host.notify(
                NoticeLevel::Warn,
                &format!("no {channel} color set for {group}"),
            );
            return;
        };
        let adjusted = op(current);
        self.write_tweak(&group, channel, adjusted);
    }

    /// Copy the active channel's current color to the host clipboard.
    pub fn copy(&mut self) {
        let Some((group, channel)) = self.target() else {
            return;
        };
        let Some(color) = self.registry.color(&group, channel) else {
            self.host.notify(
                NoticeLevel::Warn,
                &format!("no {channel} color set for {group}"),
            );
            return;
        };
        let text = color.to_string();
        self.host.clipboard_set(&text);
        self.host
            .notify(NoticeLevel::Info, &format!("copied {text} ({group}.{channel})"));
    }

    /// Apply the host clipboard contents as the active channel's color.
    pub fn paste(&mut self) {
        let Some((group, channel)) = self.target() else {
            return;
        };
        let Some(text) = self.host.clipboard_get() else {
            self.host.notify(NoticeLevel::Warn, "clipboard is empty");
            return;
        };
        self.apply_literal(&group, channel, &text);
    }

    /// Prompt the host for a literal hex color and apply it.
    pub fn pick_direct(&mut self) {
        let Some((group, channel)) = self.target() else {
            return;
        };
        let default = self
            .registry
            .color(&group, channel)
            .map(|color| color.to_string())
            .unwrap_or_default();
        let label = format!("{group}.{channel}");
        // A cancelled prompt is a plain no-op, not an error.
        let Some(text) = self.host.prompt(&label, &default) else {
            return;
        };
        self.apply_literal(&group, channel, &text);
    }

    fn apply_literal(&mut self, group: &str, channel: Channel, text: &str) {
        match Color::parse(text) {
            Ok(color) => self.write_tweak(group, channel, color),
            Err(err) => self.host.notify(NoticeLevel::Error, &err.to_string()),
        }
    }

    /// Registry write plus store record of the absolute resulting color.
    ///
    /// The store holds the result, not the delta, so restoration never needs
    /// to replay history.
    fn write_tweak(&mut self, group: &str, channel: Channel, color: Color) {
        self.registry.set_color(group, channel, color);
        let theme = self.host.active_theme();
        if let Err(err) = self.store.set_tweak(&theme, group, channel, color) {
            // The live view keeps the edit; only persistence failed.
            self.host.notify(
                NoticeLevel::Error,
                &format!("failed to save tweaks: {err}"),
            );
        }
    }

    // -- undo ---------------------------------------------------------------

    /// Remove every channel tweak for the selected group and restore the
    /// theme's original colors (re-applying the remaining tweak set).
    pub fn undo_group(&mut self) {
        let Some(item) = self.selected() else {
            return;
        };
        let group = item.group.clone();
        let theme = self.host.active_theme();
        if !self.store.is_group_tweaked(&theme, &group) {
            self.host
                .notify(NoticeLevel::Info, &format!("{group} has no tweaks"));
            return;
        }
        if let Err(err) = self.store.remove_group(&theme, &group) {
            self.host.notify(
                NoticeLevel::Error,
                &format!("failed to save tweaks: {err}"),
            );
        }
        self.host.reload_theme(&theme);
        self.store.apply_tweaks(&theme, &mut self.registry);

        if self.mode() == Some(Mode::Edited) {
            let session = self.session.as_mut().expect("edited mode implies open");
            session.items.retain(|item| item.group != group);
            if session.items.is_empty() {
                self.close();
            } else if session.selected >= session.items.len() {
                session.selected = session.items.len() - 1;
            }
        }
        self.host
            .notify(NoticeLevel::Info, &format!("reset {group} to theme colors"));
    }

    /// Remove every tweak for the active theme, restore its original colors,
    /// and close the picker.
    pub fn undo_all(&mut self) {
        let theme = self.host.active_theme();
        if let Err(err) = self.store.clear_theme(&theme) {
            self.host.notify(
                NoticeLevel::Error,
                &format!("failed to save tweaks: {err}"),
            );
        }
        self.host.reload_theme(&theme);
        self.close();
        self.host.notify(
            NoticeLevel::Info,
            &format!("removed all tweaks for theme {theme}"),
        );
    }

    // -- browse search ------------------------------------------------------

    /// Append a character to the browse query and re-filter.
    pub fn search_push(&mut self, ch: char) {
        self.edit_search(|query| query.push(ch));
    }

    /// Remove the last character of the browse query and re-filter.
    pub fn search_pop(&mut self) {
        self.edit_search(|query| {
            query.pop();
        });
    }

    /// Clear the browse query, restoring the full snapshot.
    pub fn search_clear(&mut self) {
        self.edit_search(String::clear);
    }

    fn edit_search(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(search) = session.search.as_mut() else {
            return;
        };
        edit(&mut search.query);
        // Always re-derive from the unfiltered snapshot; never filter the
        // already-filtered list.
        session.items = filter_groups(&search.snapshot, &search.query)
            .into_iter()
            .map(Item::plain)
            .collect();
        session.selected = 0;
    }

    // -- external notifications ---------------------------------------------

    /// Handle the host's "theme activated" notification: drop the possibly
    /// stale cache, then re-apply everything stored for the new theme.
    pub fn on_theme_activated(&mut self) {
        self.store.invalidate_cache();
        let theme = self.host.active_theme();
        self.store.apply_tweaks(&theme, &mut self.registry);
    }

    /// Resolve the selected group and its active channel, warning when the
    /// group has no color channels to target.
    fn target(&mut self) -> Option<(String, Channel)> {
        let group = self.selected()?.group.clone();
        match self.channel_for(&group) {
            Some(channel) => Some((group, channel)),
            None => {
                self.host.notify(
                    NoticeLevel::Warn,
                    &format!("{group} has no color channels"),
                );
                None
            }
        }
    }
}
