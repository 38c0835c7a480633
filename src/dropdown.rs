//! Dropdown controller - open/close state machine for navigation submenus

use log::{debug, trace, warn};

use crate::config::NavConfig;
use crate::error::NavResult;
use crate::view::{DropdownParts, EventBinder, EventOutcome, NavigationView};

/// Accessibility attribute reflecting the open state on the trigger
pub const ARIA_EXPANDED: &str = "aria-expanded";

/// Open state of a single dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    Closed,
    Open,
}

#[derive(Debug, Clone)]
struct WiredDropdown<E> {
    parts: DropdownParts<E>,
    state: DropdownState,
}

/// Tracks which dropdowns have listeners attached and which one is open.
///
/// Dropdowns are identified by their trigger element. At most one is open.
#[derive(Debug, Clone)]
pub struct DropdownController<E> {
    wired: Vec<WiredDropdown<E>>,
}

impl<E> Default for DropdownController<E> {
    fn default() -> Self {
        Self { wired: Vec::new() }
    }
}

impl<E: Clone + PartialEq + std::fmt::Debug> DropdownController<E> {
    /// Create a controller with nothing wired
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Discovery and wiring
    // ========================

    /// Find the dropdown groups under `container`.
    ///
    /// Groups missing their trigger or menu are skipped.
    pub fn discover<V>(view: &V, config: &NavConfig, container: &E) -> NavResult<Vec<DropdownParts<E>>>
    where
        V: NavigationView<Element = E>,
    {
        let mut groups = Vec::new();
        for root in view.query_all(container, &config.dropdown_selector)? {
            let trigger = view.query_all(&root, &config.trigger_selector)?.into_iter().next();
            let menu = view.query_all(&root, &config.menu_selector)?.into_iter().next();
            match (trigger, menu) {
                (Some(trigger), Some(menu)) => groups.push(DropdownParts { root, trigger, menu }),
                _ => debug!("Skipping dropdown {:?} without trigger and menu", root),
            }
        }
        Ok(groups)
    }

    /// Attach listeners to every dropdown not wired yet.
    ///
    /// Dropdowns whose trigger disappeared from the markup are forgotten, so
    /// re-inserted markup gets wired again. Returns the number newly wired.
    /// A dropdown counts as wired as soon as its listeners are bound.
    pub fn setup<V, B>(&mut self, view: &mut V, config: &NavConfig, binder: &mut B) -> NavResult<usize>
    where
        V: NavigationView<Element = E>,
        B: EventBinder<E> + ?Sized,
    {
        let Some(container) = view.query(&config.container_selector)? else {
            debug!("No navigation container, dropdown setup skipped");
            self.prune(&[]);
            return Ok(0);
        };

        let groups = Self::discover(view, config, &container)?;
        self.prune(&groups);

        let mut added = 0;
        for parts in groups {
            if self.is_wired(&parts.trigger) {
                continue;
            }
            binder.bind_dropdown(&parts)?;
            // bound: keep the entry even if the markup update fails
            if let Err(e) = apply_state(view, config, &parts, DropdownState::Closed) {
                warn!("Dropdown {:?} wired but not reset to closed: {}", parts.trigger, e);
            }
            self.wired.push(WiredDropdown {
                parts,
                state: DropdownState::Closed,
            });
            added += 1;
        }

        if added > 0 {
            debug!("Wired {} dropdown(s)", added);
        }
        Ok(added)
    }

    /// Forget dropdowns whose trigger is not among `groups`
    fn prune(&mut self, groups: &[DropdownParts<E>]) {
        let before = self.wired.len();
        self.wired
            .retain(|w| groups.iter().any(|g| g.trigger == w.parts.trigger));
        if self.wired.len() != before {
            debug!("Dropped {} stale dropdown(s)", before - self.wired.len());
        }
    }

    /// Whether listeners are attached for this trigger
    pub fn is_wired(&self, trigger: &E) -> bool {
        self.wired.iter().any(|w| &w.parts.trigger == trigger)
    }

    /// Number of wired dropdowns
    pub fn wired_count(&self) -> usize {
        self.wired.len()
    }

    /// Current state of the dropdown owning `trigger`
    pub fn state(&self, trigger: &E) -> Option<DropdownState> {
        self.wired
            .iter()
            .find(|w| &w.parts.trigger == trigger)
            .map(|w| w.state)
    }

    /// Number of open dropdowns (0 or 1)
    pub fn open_count(&self) -> usize {
        self.wired
            .iter()
            .filter(|w| w.state == DropdownState::Open)
            .count()
    }

    /// Forget every wired dropdown
    pub fn clear(&mut self) {
        self.wired.clear();
    }

    // ========================
    // Event handling
    // ========================

    /// Toggle the dropdown owning `trigger`; opening closes all others
    pub fn on_trigger_click<V>(&mut self, view: &mut V, config: &NavConfig, trigger: &E) -> NavResult<EventOutcome>
    where
        V: NavigationView<Element = E>,
    {
        let Some(index) = self.wired.iter().position(|w| &w.parts.trigger == trigger) else {
            return Ok(EventOutcome::proceed());
        };

        match self.wired[index].state {
            DropdownState::Open => self.transition(view, config, index, DropdownState::Closed)?,
            DropdownState::Closed => {
                for other in 0..self.wired.len() {
                    if other != index {
                        self.transition(view, config, other, DropdownState::Closed)?;
                    }
                }
                self.transition(view, config, index, DropdownState::Open)?;
            }
        }

        Ok(EventOutcome::prevent_default())
    }

    /// Click inside a menu: links close it, anything else is contained
    pub fn on_menu_click<V>(&mut self, view: &mut V, config: &NavConfig, menu: &E, target: &E) -> NavResult<EventOutcome>
    where
        V: NavigationView<Element = E>,
    {
        let Some(index) = self.wired.iter().position(|w| &w.parts.menu == menu) else {
            return Ok(EventOutcome::proceed());
        };

        let on_link = match view.closest(target, &config.link_selector)? {
            Some(link) => view.contains(menu, &link),
            None => false,
        };

        if on_link {
            self.transition(view, config, index, DropdownState::Closed)?;
            Ok(EventOutcome::proceed())
        } else {
            Ok(EventOutcome::stop_propagation())
        }
    }

    /// Document click: close open dropdowns the click landed outside of
    pub fn on_document_click<V>(&mut self, view: &mut V, config: &NavConfig, target: Option<&E>) -> NavResult<()>
    where
        V: NavigationView<Element = E>,
    {
        for index in 0..self.wired.len() {
            if self.wired[index].state != DropdownState::Open {
                continue;
            }
            let inside = target.is_some_and(|t| view.contains(&self.wired[index].parts.root, t));
            if !inside {
                self.transition(view, config, index, DropdownState::Closed)?;
            }
        }
        Ok(())
    }

    /// Keydown anywhere: ESC closes every open dropdown and refocuses its trigger
    pub fn on_keydown<V>(&mut self, view: &mut V, config: &NavConfig, key: &str) -> NavResult<()>
    where
        V: NavigationView<Element = E>,
    {
        if key != "Escape" && key != "Esc" {
            return Ok(());
        }

        let mut last_closed = None;
        for index in 0..self.wired.len() {
            if self.wired[index].state == DropdownState::Open {
                self.transition(view, config, index, DropdownState::Closed)?;
                last_closed = Some(index);
            }
        }

        if let Some(index) = last_closed {
            let trigger = self.wired[index].parts.trigger.clone();
            view.focus(&trigger)?;
        }
        Ok(())
    }

    fn transition<V>(&mut self, view: &mut V, config: &NavConfig, index: usize, next: DropdownState) -> NavResult<()>
    where
        V: NavigationView<Element = E>,
    {
        let wired = &mut self.wired[index];
        if wired.state == next {
            return Ok(());
        }
        trace!("Dropdown {:?}: {:?} -> {:?}", wired.parts.trigger, wired.state, next);
        apply_state(view, config, &wired.parts, next)?;
        wired.state = next;
        Ok(())
    }
}

/// Reflect `state` on the markup: open class on the root, aria-expanded on the trigger
fn apply_state<V: NavigationView>(
    view: &mut V,
    config: &NavConfig,
    parts: &DropdownParts<V::Element>,
    state: DropdownState,
) -> NavResult<()> {
    match state {
        DropdownState::Open => {
            view.add_class(&parts.root, &config.open_class)?;
            view.set_attribute(&parts.trigger, ARIA_EXPANDED, "true")
        }
        DropdownState::Closed => {
            view.remove_class(&parts.root, &config.open_class)?;
            view.set_attribute(&parts.trigger, ARIA_EXPANDED, "false")
        }
    }
}
