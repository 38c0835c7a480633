//! Navigation view - the DOM capabilities the core logic works through

use std::fmt;

use crate::error::NavResult;

/// Read/write access to the navigation markup.
///
/// Implemented over `web_sys` in the browser and by [`crate::memory::MemoryView`]
/// for tests. Elements are cheap handles compared by identity.
pub trait NavigationView {
    /// Element handle; equality means "same element"
    type Element: Clone + PartialEq + fmt::Debug;

    /// Full URL of the current page, if the host exposes one
    fn location(&self) -> Option<String>;

    /// First element in the document matching `selector`
    fn query(&self, selector: &str) -> NavResult<Option<Self::Element>>;

    /// Descendants of `scope` matching `selector`, in document order
    fn query_all(&self, scope: &Self::Element, selector: &str) -> NavResult<Vec<Self::Element>>;

    /// Nearest inclusive ancestor of `element` matching `selector`
    fn closest(&self, element: &Self::Element, selector: &str) -> NavResult<Option<Self::Element>>;

    /// Whether `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str) -> NavResult<()>;

    fn remove_attribute(&mut self, element: &Self::Element, name: &str) -> NavResult<()>;

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    fn add_class(&mut self, element: &Self::Element, class: &str) -> NavResult<()>;

    fn remove_class(&mut self, element: &Self::Element, class: &str) -> NavResult<()>;

    /// Move keyboard focus to `element`
    fn focus(&mut self, element: &Self::Element) -> NavResult<()>;
}

/// Installs event listeners on behalf of the navigation lifecycle
pub trait EventBinder<E> {
    /// Listen for clicks on the dropdown's trigger and menu
    fn bind_dropdown(&mut self, parts: &DropdownParts<E>) -> NavResult<()>;

    /// Listen for document-level clicks and keydowns
    fn bind_document(&mut self) -> NavResult<()>;

    /// Detach everything this binder installed
    fn release_all(&mut self);
}

/// The elements making up one dropdown group
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownParts<E> {
    /// Element grouping trigger and menu
    pub root: E,
    /// Clickable element that opens/closes the menu
    pub trigger: E,
    /// Collapsible container of links
    pub menu: E,
}

/// What the host should do with the event after a handler ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl EventOutcome {
    /// Let the event continue untouched
    pub fn proceed() -> Self {
        Self::default()
    }

    /// Cancel the default action (e.g. following `href="#"`)
    pub fn prevent_default() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: false,
        }
    }

    /// Keep the event from reaching outer handlers
    pub fn stop_propagation() -> Self {
        Self {
            prevent_default: false,
            stop_propagation: true,
        }
    }
}
