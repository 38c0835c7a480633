//! Shared fixture: a small club website header

#![allow(dead_code)]

use site_nav::prelude::*;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Handles into the fixture markup
pub struct Site {
    pub home: NodeId,
    /// Dropdown A: `<button>` trigger
    pub verein: DropdownParts<NodeId>,
    pub chronik: NodeId,
    pub vorstand: NodeId,
    /// Plain text inside menu A, not a link
    pub verein_note: NodeId,
    /// Dropdown B: `<a href="#">` trigger
    pub service: DropdownParts<NodeId>,
    pub kontakt: NodeId,
    pub external: NodeId,
    pub mail: NodeId,
    pub content: NodeId,
}

/// Build the header markup for a page at `location`
pub fn site(location: &str) -> (MemoryView, Site) {
    let mut view = MemoryView::new(location);
    let body = view.body();
    let header = view.append(body, "header");
    let nav = view.append(header, "nav");
    let list = view.append(nav, "ul");

    let item = view.append(list, "li");
    let home = view.append_link(item, "index.html");

    let verein_root = view.append_with_class(list, "li", "dropdown");
    let verein_trigger = view.append_with_class(verein_root, "button", "dropdown-toggle");
    let verein_menu = view.append_with_class(verein_root, "ul", "dropdown-menu");
    let item = view.append(verein_menu, "li");
    let chronik = view.append_link(item, "chronik.html");
    let item = view.append(verein_menu, "li");
    let vorstand = view.append_link(item, "vorstand.html");
    let verein_note = view.append_with_class(verein_menu, "li", "divider");

    let service_root = view.append_with_class(list, "li", "dropdown");
    let service_trigger = view.append_with_class(service_root, "a", "dropdown-toggle");
    view.set_attribute(&service_trigger, "href", "#").unwrap();
    let service_menu = view.append_with_class(service_root, "ul", "dropdown-menu");
    let item = view.append(service_menu, "li");
    let kontakt = view.append_link(item, "/kontakt.html");

    let item = view.append(list, "li");
    let external = view.append_link(item, "https://other.example/chronik.html");
    let item = view.append(list, "li");
    let mail = view.append_link(item, "mailto:info@example.org");

    let content = view.append(body, "main");

    let site = Site {
        home,
        verein: DropdownParts {
            root: verein_root,
            trigger: verein_trigger,
            menu: verein_menu,
        },
        chronik,
        vorstand,
        verein_note,
        service: DropdownParts {
            root: service_root,
            trigger: service_trigger,
            menu: service_menu,
        },
        kontakt,
        external,
        mail,
        content,
    };
    (view, site)
}

/// Fixture wrapped in a lifecycle that has been initialized once
pub fn initialized(location: &str) -> (Navigation<MemoryView>, RecordingBinder, Site) {
    init_logging();
    let (view, site) = site(location);
    let mut nav = Navigation::new(view, NavConfig::default());
    let mut binder = RecordingBinder::new();
    nav.initialize(&mut binder);
    (nav, binder, site)
}

/// Elements carrying `class`, among the links and triggers of the fixture
pub fn marked(nav: &Navigation<MemoryView>, site: &Site, class: &str) -> Vec<NodeId> {
    [
        site.home,
        site.verein.trigger,
        site.chronik,
        site.vorstand,
        site.service.trigger,
        site.kontakt,
        site.external,
        site.mail,
    ]
    .into_iter()
    .filter(|n| nav.view().has_class(n, class))
    .collect()
}
