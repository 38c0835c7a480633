//! Site Nav - navigation helpers for static websites
//!
//! Highlights the navigation link for the current page and drives dropdown
//! submenus:
//! - Same-origin path resolution and normalization of link targets
//! - Active-link marking, including the trigger of the enclosing dropdown
//! - Dropdowns that open one at a time and close on outside click, ESC or
//!   link selection
//! - An idempotent entry point that can run again whenever markup is inserted
//!
//! The core works against the [`NavigationView`](view::NavigationView) trait.
//! With the `wasm` feature the crate binds to the browser DOM through
//! `web-sys` and exports `initNavigation`.
//!
//! ## Example
//! ```rust
//! use site_nav::prelude::*;
//!
//! let mut view = MemoryView::new("https://example.org/chronik.html");
//! let body = view.body();
//! let nav = view.append(body, "nav");
//! let home = view.append_link(nav, "index.html");
//! let chronik = view.append_link(nav, "chronik.html");
//!
//! let mut nav = Navigation::new(view, NavConfig::default());
//! let mut binder = RecordingBinder::new();
//! let report = nav.initialize(&mut binder);
//!
//! assert_eq!(report.active_links, 1);
//! assert!(nav.view().has_class(&chronik, "active"));
//! assert!(!nav.view().has_class(&home, "active"));
//! ```

pub mod config;
pub mod dropdown;
pub mod error;
pub mod marker;
pub mod memory;
pub mod navigation;
pub mod path;
pub mod view;

// Re-export common types
pub mod prelude {
    pub use crate::config::NavConfig;
    pub use crate::dropdown::{DropdownController, DropdownState};
    pub use crate::error::{NavError, NavResult};
    pub use crate::marker::mark_active_links;
    pub use crate::memory::{MemoryView, NodeId, RecordingBinder};
    pub use crate::navigation::{InitReport, Navigation};
    pub use crate::path::{normalize_path, PathResolver};
    pub use crate::view::{DropdownParts, EventBinder, EventOutcome, NavigationView};
}

#[cfg(feature = "wasm")]
pub mod web;
