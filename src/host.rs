//! Collaborator traits implemented by the embedding editor layer.
//!
//! The core never talks to windows, keymaps, clipboards, or documents
//! directly; everything editor-shaped comes through [`HostEnv`] (and
//! [`crate::registry::HighlightSource`] for live highlight state).

use std::fmt;

/// Severity of a user-visible notice emitted by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warn => f.write_str("warn"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Where a cursor-context group name came from.
///
/// The picker consumes only the names; provenance is carried for hosts that
/// want to display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrigin {
    /// Regex-based syntax highlighting.
    Syntax,
    /// Structured-syntax (tree) capture.
    Capture,
    /// Semantic token from a language server.
    Semantic,
    /// Overlay/extmark highlight.
    Overlay,
}

/// One highlight group active at the cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorGroup {
    pub name: String,
    pub origin: GroupOrigin,
}

/// Editor services the core calls out to.
///
/// All methods are synchronous; the single active editor session is the
/// assumed concurrency model.
pub trait HostEnv {
    /// Name of the currently active visual theme.
    fn active_theme(&self) -> String;

    /// Re-run theme setup for a theme, restoring its original colors.
    ///
    /// Used by undo so stored tweaks can be re-applied on top of a clean
    /// slate afterwards.
    fn reload_theme(&mut self, theme: &str);

    /// Read the clipboard text register, if any.
    fn clipboard_get(&mut self) -> Option<String>;

    /// Write the clipboard text register.
    fn clipboard_set(&mut self, text: &str);

    /// Prompt the user for text; `None` means cancelled.
    fn prompt(&mut self, label: &str, default: &str) -> Option<String>;

    /// De-duplicated, ordered highlight groups at the current cursor position.
    fn groups_at_cursor(&mut self) -> Vec<CursorGroup>;

    /// Surface a notice to the user.
    fn notify(&mut self, level: NoticeLevel, message: &str);
}
