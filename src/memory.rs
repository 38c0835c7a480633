//! In-memory navigation view for tests and headless use
//!
//! `MemoryView` is a small arena-backed element tree implementing
//! [`NavigationView`]. `RecordingBinder` records the listeners the lifecycle
//! asks for and replays clicks and keydowns through them, bubbling from the
//! target up to the document the way a browser would.

use std::collections::BTreeMap;

use crate::error::{NavError, NavResult};
use crate::navigation::Navigation;
use crate::view::{DropdownParts, EventBinder, EventOutcome, NavigationView};

/// Handle to an element in a [`MemoryView`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct MemoryNode {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
}

impl MemoryNode {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent,
            children: Vec::new(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }
}

/// Arena-backed element tree with a page location
#[derive(Debug, Clone)]
pub struct MemoryView {
    nodes: Vec<MemoryNode>,
    location: Option<String>,
    focused: Option<NodeId>,
}

impl MemoryView {
    /// Empty document (just a `body`) at `location`
    pub fn new(location: &str) -> Self {
        Self {
            nodes: vec![MemoryNode::new("body", None)],
            location: Some(location.to_string()),
            focused: None,
        }
    }

    /// Empty document whose host exposes no location
    pub fn without_location() -> Self {
        Self {
            location: None,
            ..Self::new("")
        }
    }

    /// The document root
    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    pub fn set_location(&mut self, location: &str) {
        self.location = Some(location.to_string());
    }

    /// Append a new element under `parent`
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MemoryNode::new(tag, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append an element carrying space-separated `classes`
    pub fn append_with_class(&mut self, parent: NodeId, tag: &str, classes: &str) -> NodeId {
        let id = self.append(parent, tag);
        self.nodes[id.0].classes = classes.split_whitespace().map(str::to_string).collect();
        id
    }

    /// Append an anchor with the given `href`
    pub fn append_link(&mut self, parent: NodeId, href: &str) -> NodeId {
        let id = self.append(parent, "a");
        self.nodes[id.0].attributes.insert("href".to_string(), href.to_string());
        id
    }

    /// Remove `node` (and its subtree) from the document
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.nodes[node.0].classes
    }

    /// Element that last received focus
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// `node` followed by its ancestors, innermost first
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(parent) = self.nodes[current.0].parent {
            path.push(parent);
            current = parent;
        }
        path
    }

    fn descendants(&self, scope: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[scope.0].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn matches(&self, node: NodeId, selector: &SelectorList) -> bool {
        let node = &self.nodes[node.0];
        selector.alternatives.iter().any(|compound| {
            compound.tag.as_ref().map_or(true, |tag| tag == "*" || *tag == node.tag)
                && compound
                    .id
                    .as_ref()
                    .map_or(true, |id| node.attributes.get("id") == Some(id))
                && compound.classes.iter().all(|c| node.classes.contains(c))
                && compound.attributes.iter().all(|(name, value)| match value {
                    Some(value) => node.attributes.get(name) == Some(value),
                    None => node.attributes.contains_key(name),
                })
        })
    }
}

impl NavigationView for MemoryView {
    type Element = NodeId;

    fn location(&self) -> Option<String> {
        self.location.clone()
    }

    fn query(&self, selector: &str) -> NavResult<Option<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        let root = self.body();
        if self.matches(root, &selector) {
            return Ok(Some(root));
        }
        let mut all = Vec::new();
        self.descendants(root, &mut all);
        Ok(all.into_iter().find(|n| self.matches(*n, &selector)))
    }

    fn query_all(&self, scope: &NodeId, selector: &str) -> NavResult<Vec<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        let mut all = Vec::new();
        self.descendants(*scope, &mut all);
        Ok(all.into_iter().filter(|n| self.matches(*n, &selector)).collect())
    }

    fn closest(&self, element: &NodeId, selector: &str) -> NavResult<Option<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        Ok(self
            .ancestors(*element)
            .into_iter()
            .find(|n| self.matches(*n, &selector)))
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.ancestors(*node).contains(ancestor)
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        let node = &self.nodes[element.0];
        if name == "class" {
            return Some(node.classes.join(" "));
        }
        node.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) -> NavResult<()> {
        let node = &mut self.nodes[element.0];
        if name == "class" {
            node.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            node.attributes.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_attribute(&mut self, element: &NodeId, name: &str) -> NavResult<()> {
        let node = &mut self.nodes[element.0];
        if name == "class" {
            node.classes.clear();
        } else {
            node.attributes.remove(name);
        }
        Ok(())
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.nodes[element.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, element: &NodeId, class: &str) -> NavResult<()> {
        let classes = &mut self.nodes[element.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&mut self, element: &NodeId, class: &str) -> NavResult<()> {
        self.nodes[element.0].classes.retain(|c| c != class);
        Ok(())
    }

    fn focus(&mut self, element: &NodeId) -> NavResult<()> {
        self.focused = Some(*element);
        Ok(())
    }
}

// ========================
// Selector subset
// ========================

/// Comma-separated compound selectors: `tag`, `#id`, `.class`,
/// `[attr]` and `[attr=value]`. Combinators are not supported.
#[derive(Debug, Clone, PartialEq)]
struct SelectorList {
    alternatives: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl SelectorList {
    fn parse(selector: &str) -> NavResult<Self> {
        let alternatives = selector
            .split(',')
            .map(|part| parse_compound(part.trim()).ok_or_else(|| NavError::InvalidSelector(selector.to_string())))
            .collect::<NavResult<Vec<_>>>()?;
        Ok(Self { alternatives })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(rest: &str) -> Option<(&str, &str)> {
    let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
    if end == 0 {
        None
    } else {
        Some((&rest[..end], &rest[end..]))
    }
}

fn parse_compound(part: &str) -> Option<Compound> {
    if part.is_empty() {
        return None;
    }

    let mut compound = Compound::default();
    let mut rest = part;

    if let Some(after) = rest.strip_prefix('*') {
        compound.tag = Some("*".to_string());
        rest = after;
    } else if let Some((tag, after)) = take_ident(rest) {
        compound.tag = Some(tag.to_ascii_lowercase());
        rest = after;
    }

    while let Some(c) = rest.chars().next() {
        match c {
            '.' => {
                let (class, after) = take_ident(&rest[1..])?;
                compound.classes.push(class.to_string());
                rest = after;
            }
            '#' => {
                let (id, after) = take_ident(&rest[1..])?;
                compound.id = Some(id.to_string());
                rest = after;
            }
            '[' => {
                let close = rest.find(']')?;
                let inner = &rest[1..close];
                let attribute = match inner.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches(|q: char| q == '"' || q == '\'');
                        (name.trim().to_string(), Some(value.to_string()))
                    }
                    None => (inner.trim().to_string(), None),
                };
                if attribute.0.is_empty() || !attribute.0.chars().all(is_ident_char) {
                    return None;
                }
                compound.attributes.push(attribute);
                rest = &rest[close + 1..];
            }
            _ => return None,
        }
    }

    Some(compound)
}

// ========================
// Recording binder
// ========================

/// Records requested listeners and dispatches synthetic events through them
#[derive(Debug, Clone, Default)]
pub struct RecordingBinder {
    dropdowns: Vec<DropdownParts<NodeId>>,
    document: usize,
    releases: usize,
}

impl RecordingBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dropdown bindings currently held
    pub fn dropdown_bindings(&self) -> usize {
        self.dropdowns.len()
    }

    /// Number of document-level bindings currently held
    pub fn document_bindings(&self) -> usize {
        self.document
    }

    pub fn releases(&self) -> usize {
        self.releases
    }

    /// Dispatch a click on `target`, bubbling up to the document.
    ///
    /// Every recorded binding fires, so duplicated listeners show up as
    /// duplicated handler calls.
    pub fn click(&self, nav: &mut Navigation<MemoryView>, target: NodeId) -> EventOutcome {
        let mut outcome = EventOutcome::default();

        for node in nav.view().ancestors(target) {
            for parts in &self.dropdowns {
                if parts.trigger == node {
                    merge(&mut outcome, nav.on_trigger_click(&node));
                }
                if parts.menu == node {
                    merge(&mut outcome, nav.on_menu_click(&node, &target));
                }
            }
            if outcome.stop_propagation {
                return outcome;
            }
        }

        for _ in 0..self.document {
            nav.on_document_click(Some(&target));
        }
        outcome
    }

    /// Dispatch a keydown with the given key name at the document
    pub fn press_key(&self, nav: &mut Navigation<MemoryView>, key: &str) {
        for _ in 0..self.document {
            nav.on_keydown(key);
        }
    }
}

fn merge(total: &mut EventOutcome, next: EventOutcome) {
    total.prevent_default |= next.prevent_default;
    total.stop_propagation |= next.stop_propagation;
}

impl EventBinder<NodeId> for RecordingBinder {
    fn bind_dropdown(&mut self, parts: &DropdownParts<NodeId>) -> NavResult<()> {
        self.dropdowns.push(parts.clone());
        Ok(())
    }

    fn bind_document(&mut self) -> NavResult<()> {
        self.document += 1;
        Ok(())
    }

    fn release_all(&mut self) {
        self.dropdowns.clear();
        self.document = 0;
        self.releases += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parsing() {
        let list = SelectorList::parse("#site-nav, nav").unwrap();
        assert_eq!(list.alternatives.len(), 2);
        assert_eq!(list.alternatives[0].id.as_deref(), Some("site-nav"));
        assert_eq!(list.alternatives[1].tag.as_deref(), Some("nav"));

        let list = SelectorList::parse("a.nav-link[href]").unwrap();
        let compound = &list.alternatives[0];
        assert_eq!(compound.tag.as_deref(), Some("a"));
        assert_eq!(compound.classes, vec!["nav-link".to_string()]);
        assert_eq!(compound.attributes, vec![("href".to_string(), None)]);
    }

    #[test]
    fn test_unsupported_selector() {
        for selector in ["", "nav a", "a > b", ".", "[", "a,"] {
            assert!(
                matches!(SelectorList::parse(selector), Err(NavError::InvalidSelector(_))),
                "selector {:?}",
                selector
            );
        }
    }

    #[test]
    fn test_query_in_document_order() {
        let mut view = MemoryView::new("https://example.org/");
        let body = view.body();
        let header = view.append(body, "header");
        let nav = view.append(header, "nav");
        let first = view.append_link(nav, "a.html");
        let second = view.append_link(nav, "b.html");
        view.append(nav, "a");

        assert_eq!(view.query("nav").unwrap(), Some(nav));
        assert_eq!(view.query_all(&nav, "a[href]").unwrap(), vec![first, second]);
        assert_eq!(view.query_all(&body, "a[href=\"b.html\"]").unwrap(), vec![second]);
    }

    #[test]
    fn test_closest_and_contains() {
        let mut view = MemoryView::new("https://example.org/");
        let body = view.body();
        let dropdown = view.append_with_class(body, "li", "dropdown");
        let menu = view.append_with_class(dropdown, "ul", "dropdown-menu");
        let link = view.append_link(menu, "x.html");
        let span = view.append(link, "span");

        assert_eq!(view.closest(&span, "a[href]").unwrap(), Some(link));
        assert_eq!(view.closest(&span, ".dropdown").unwrap(), Some(dropdown));
        assert_eq!(view.closest(&dropdown, ".dropdown-menu").unwrap(), None);
        assert!(view.contains(&dropdown, &span));
        assert!(view.contains(&span, &span));
        assert!(!view.contains(&menu, &dropdown));
    }

    #[test]
    fn test_detach_hides_subtree() {
        let mut view = MemoryView::new("https://example.org/");
        let body = view.body();
        let nav = view.append(body, "nav");
        view.append_link(nav, "a.html");
        view.detach(nav);

        assert_eq!(view.query("nav").unwrap(), None);
        assert!(!view.contains(&body, &nav));
    }

    #[test]
    fn test_class_attribute_mirrors_class_list() {
        let mut view = MemoryView::new("https://example.org/");
        let body = view.body();
        let el = view.append_with_class(body, "div", "a b");
        view.add_class(&el, "c").unwrap();
        view.add_class(&el, "a").unwrap();
        assert_eq!(view.attribute(&el, "class").as_deref(), Some("a b c"));
        view.remove_class(&el, "b").unwrap();
        assert_eq!(view.classes(el), ["a".to_string(), "c".to_string()]);
    }
}
