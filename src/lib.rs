//! Retint — live highlight-group color tweaking for editor themes.
//!
//! This crate is the editor-agnostic core of an in-editor color picker:
//! a small HSL color engine, a registry view over live highlight groups,
//! a JSON-persisted per-theme tweak store, and the picker state machine
//! that ties them together. The embedding editor supplies the UI and the
//! [`host::HostEnv`] / [`registry::HighlightSource`] seams.
//!
//! # Quick start
//!
//! ```no_run
//! use retint::picker::{AdjustSteps, Picker};
//! use retint::store::TweakStore;
//! # fn example(host: impl retint::host::HostEnv, source: impl retint::registry::HighlightSource) {
//! let store = TweakStore::new("/tmp/tweaks.json");
//! let mut picker = Picker::new(host, source, store, AdjustSteps::default());
//! picker.open_categories();
//! picker.hue_up();
//! # }
//! ```

pub mod build_info;
pub mod color;
pub mod config;
pub mod error;
pub mod filter;
pub mod host;
pub mod picker;
pub mod registry;
pub mod store;
#[cfg(test)]
pub mod testsupport;
