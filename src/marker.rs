//! Active-link marker - flags the navigation link for the current page

use log::{debug, trace};

use crate::config::NavConfig;
use crate::error::{NavError, NavResult};
use crate::path::PathResolver;
use crate::view::NavigationView;

/// Attribute announcing the current page to assistive technology
pub const ARIA_CURRENT: &str = "aria-current";

/// Mark every navigation link pointing at the current page.
///
/// Prior marks are cleared first, so repeated calls never accumulate.
/// Links inside a dropdown also mark that dropdown's trigger. Duplicate
/// links to the same page are all marked. Returns the number of links marked.
pub fn mark_active_links<V: NavigationView>(view: &mut V, config: &NavConfig) -> NavResult<usize> {
    let Some(container) = view.query(&config.container_selector)? else {
        debug!("No navigation container matches '{}'", config.container_selector);
        return Ok(0);
    };

    let links = view.query_all(&container, &config.link_selector)?;
    let triggers = view.query_all(&container, &config.trigger_selector)?;

    for link in &links {
        view.remove_class(link, &config.active_class)?;
        view.remove_attribute(link, ARIA_CURRENT)?;
    }
    for trigger in &triggers {
        view.remove_class(trigger, &config.active_class)?;
    }

    let location = view.location().ok_or(NavError::MissingLocation)?;
    let resolver = PathResolver::new(&location, &config.index_document)?;
    let current = resolver.current_path();

    let mut marked = 0;
    for link in &links {
        let Some(href) = view.attribute(link, "href") else {
            continue;
        };
        let Some(path) = resolver.resolve(&href) else {
            trace!("Skipping non-comparable href '{}'", href);
            continue;
        };
        if path != current {
            continue;
        }

        view.add_class(link, &config.active_class)?;
        view.set_attribute(link, ARIA_CURRENT, "page")?;
        marked += 1;

        if let Some(root) = view.closest(link, &config.dropdown_selector)? {
            if view.contains(&container, &root) {
                if let Some(trigger) = view.query_all(&root, &config.trigger_selector)?.into_iter().next() {
                    view.add_class(&trigger, &config.active_class)?;
                }
            }
        }
    }

    debug!("Marked {} active link(s) for {}", marked, current);
    Ok(marked)
}
