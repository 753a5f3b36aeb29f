//! In-memory view of the host editor's highlight groups.
//!
//! Groups are owned by the editor's live theme state; this module only reads
//! and writes through the [`HighlightSource`] accessor so color changes are
//! visible to the host renderer immediately. Nothing here persists anything.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum link hops followed when resolving a group's colors.
///
/// Linked groups form a reference chain; a cycle resolves to "no colors"
/// once the cap is hit instead of looping.
const MAX_LINK_DEPTH: usize = 10;

/// One of the three color slots a highlight group can define.
///
/// Ordering is the fixed display/cycling priority: `fg`, `bg`, `sp`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Foreground (text) color.
    Fg,
    /// Background color.
    Bg,
    /// Special color (underline/undercurl).
    Sp,
}

impl Channel {
    /// All channels in fixed priority order.
    pub const ALL: [Channel; 3] = [Channel::Fg, Channel::Bg, Channel::Sp];

    /// Stable wire/display key (`fg`, `bg`, `sp`).
    pub fn key(self) -> &'static str {
        match self {
            Self::Fg => "fg",
            Self::Bg => "bg",
            Self::Sp => "sp",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolved per-channel colors for a group. "(none)" is all-`None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelColors {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub sp: Option<Color>,
}

impl ChannelColors {
    /// Read one slot.
    pub fn get(&self, channel: Channel) -> Option<Color> {
        match channel {
            Channel::Fg => self.fg,
            Channel::Bg => self.bg,
            Channel::Sp => self.sp,
        }
    }

    /// Write one slot.
    pub fn set(&mut self, channel: Channel, color: Color) {
        match channel {
            Channel::Fg => self.fg = Some(color),
            Channel::Bg => self.bg = Some(color),
            Channel::Sp => self.sp = Some(color),
        }
    }

    /// True when no channel is set.
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.sp.is_none()
    }
}

/// A highlight group definition as the host editor reports it.
///
/// A `Link` has no colors of its own and inherits the target's; channel
/// queries follow the reference up to [`MAX_LINK_DEPTH`] hops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightDef {
    Direct(ChannelColors),
    Link { target: String },
}

/// Accessor for the editor's live highlight state.
///
/// Reading returns the group's own (non-link-following) definition; the
/// registry handles link resolution. Writes must be immediately visible to
/// the host renderer.
pub trait HighlightSource {
    /// The group's own definition, or `None` for an unknown group.
    fn get(&self, group: &str) -> Option<HighlightDef>;

    /// Write one channel of a group directly into the live theme state.
    fn set_color(&mut self, group: &str, channel: Channel, color: Color);

    /// Every group name the host currently knows, in host order.
    fn all_groups(&self) -> Vec<String>;
}

/// Read/write façade over a [`HighlightSource`] with link resolution.
#[derive(Debug)]
pub struct Registry<S: HighlightSource> {
    source: S,
}

impl<S: HighlightSource> Registry<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The fully resolved channel colors for a group, following links.
    pub fn colors(&self, group: &str) -> ChannelColors {
        let mut name = group.to_string();
        for _ in 0..MAX_LINK_DEPTH {
            match self.source.get(&name) {
                Some(HighlightDef::Direct(colors)) => return colors,
                Some(HighlightDef::Link { target }) => name = target,
                None => return ChannelColors::default(),
            }
        }
        ChannelColors::default()
    }

    /// Current resolved color of one channel, or `None` when unset.
    pub fn color(&self, group: &str, channel: Channel) -> Option<Color> {
        self.colors(group).get(channel)
    }

    /// Channels the group currently defines, in fixed `fg, bg, sp` order.
    pub fn available_channels(&self, group: &str) -> Vec<Channel> {
        let colors = self.colors(group);
        Channel::ALL
            .into_iter()
            .filter(|channel| colors.get(*channel).is_some())
            .collect()
    }

    /// Write through to the live theme state. Visible immediately to any
    /// renderer; never persists on its own.
    pub fn set_color(&mut self, group: &str, channel: Channel, color: Color) {
        self.source.set_color(group, channel, color);
    }

    /// Every group name the host knows (browse mode input).
    pub fn all_groups(&self) -> Vec<String> {
        self.source.all_groups()
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// A named, ordered list of curated groups for the default picker view.
///
/// Static configuration only; the preferred channel is a display hint and
/// does not restrict which channels are editable.
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub name: &'static str,
    pub entries: &'static [(&'static str, Channel)],
}

/// The curated category table shown by the categories picker mode.
pub fn categories() -> &'static [Category] {
    const CATEGORIES: &[Category] = &[
        Category {
            name: "interface",
            entries: &[
                ("Normal", Channel::Bg),
                ("NormalFloat", Channel::Bg),
                ("CursorLine", Channel::Bg),
                ("Visual", Channel::Bg),
                ("Pmenu", Channel::Bg),
                ("PmenuSel", Channel::Bg),
                ("StatusLine", Channel::Bg),
                ("LineNr", Channel::Fg),
                ("CursorLineNr", Channel::Fg),
                ("WinSeparator", Channel::Fg),
            ],
        },
        Category {
            name: "syntax",
            entries: &[
                ("Comment", Channel::Fg),
                ("String", Channel::Fg),
                ("Function", Channel::Fg),
                ("Keyword", Channel::Fg),
                ("Constant", Channel::Fg),
                ("Type", Channel::Fg),
                ("Identifier", Channel::Fg),
                ("Operator", Channel::Fg),
                ("@variable", Channel::Fg),
                ("@punctuation", Channel::Fg),
            ],
        },
        Category {
            name: "diagnostics",
            entries: &[
                ("DiagnosticError", Channel::Fg),
                ("DiagnosticWarn", Channel::Fg),
                ("DiagnosticInfo", Channel::Fg),
                ("DiagnosticHint", Channel::Fg),
                ("DiagnosticUnderlineError", Channel::Sp),
                ("DiagnosticUnderlineWarn", Channel::Sp),
            ],
        },
        Category {
            name: "search",
            entries: &[
                ("Search", Channel::Bg),
                ("IncSearch", Channel::Bg),
                ("CurSearch", Channel::Bg),
                ("MatchParen", Channel::Bg),
            ],
        },
    ];
    CATEGORIES
}
