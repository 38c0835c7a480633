//! WASM bindings - runs the navigation helpers against the browser DOM
//!
//! Exposes `initNavigation`, `initNavigationWith` and `resetNavigation` to
//! JavaScript. The lifecycle lives in a thread-local; listener closures only
//! hold a weak reference to it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, warn, Level, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent, Node, Window};

use crate::config::NavConfig;
use crate::error::{NavError, NavResult};
use crate::navigation::{InitReport, Navigation};
use crate::view::{DropdownParts, EventBinder, EventOutcome, NavigationView};

type SharedNavigation = Rc<RefCell<Navigation<DomView>>>;

thread_local! {
    static APP: RefCell<Option<WebApp>> = RefCell::new(None);
}

/// Install panic hook and console logging, then run a first pass
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    init_logging(NavConfig::default().log_level_filter());
    init_navigation();
}

/// Mark the active link and wire dropdowns with the default configuration.
///
/// Safe to call before the navigation markup exists and again after it
/// has been (re)inserted.
#[wasm_bindgen(js_name = initNavigation)]
pub fn init_navigation() {
    run(None);
}

/// Like `initNavigation`, with a configuration object overriding defaults
#[wasm_bindgen(js_name = initNavigationWith)]
pub fn init_navigation_with(config: JsValue) {
    let config = match serde_wasm_bindgen::from_value::<NavConfig>(config) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring navigation config: {}", e);
            return;
        }
    };
    if let Err(e) = config.validate() {
        warn!("Ignoring navigation config: {}", e);
        return;
    }
    log::set_max_level(config.log_level_filter());
    run(Some(config));
}

/// Detach every listener installed so far
#[wasm_bindgen(js_name = resetNavigation)]
pub fn reset_navigation() {
    APP.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            warn!("Navigation reset skipped: lifecycle busy");
            return;
        };
        if let Some(WebApp { nav, binder }) = slot.as_mut() {
            match nav.try_borrow_mut() {
                Ok(mut nav) => nav.reset(binder),
                Err(_) => warn!("Navigation reset skipped: lifecycle busy"),
            }
        }
    });
}

fn run(config: Option<NavConfig>) {
    APP.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            warn!("Navigation initialization skipped: lifecycle busy");
            return;
        };

        if slot.is_none() {
            match WebApp::new(config.clone().unwrap_or_default()) {
                Ok(app) => *slot = Some(app),
                Err(e) => {
                    warn!("Navigation unavailable: {}", e);
                    return;
                }
            }
        }

        if let Some(app) = slot.as_mut() {
            if let Some(config) = config {
                app.reconfigure(config);
            }
            app.initialize();
        }
    });
}

// ========================
// Lifecycle holder
// ========================

struct WebApp {
    nav: SharedNavigation,
    binder: WebBinder,
}

impl WebApp {
    fn new(config: NavConfig) -> NavResult<Self> {
        let window = web_sys::window().ok_or(NavError::Environment("no global window"))?;
        let document = window
            .document()
            .ok_or(NavError::Environment("window has no document"))?;

        let view = DomView {
            window,
            document: document.clone(),
        };
        let nav = Rc::new(RefCell::new(Navigation::new(view, config)));
        let binder = WebBinder {
            nav: Rc::downgrade(&nav),
            document,
            listeners: Vec::new(),
        };
        Ok(Self { nav, binder })
    }

    /// Switching selectors invalidates existing wiring, so start over
    fn reconfigure(&mut self, config: NavConfig) {
        let Ok(mut nav) = self.nav.try_borrow_mut() else {
            return;
        };
        if nav.config() != &config {
            nav.reset(&mut self.binder);
            nav.set_config(config);
        }
    }

    fn initialize(&mut self) -> InitReport {
        match self.nav.try_borrow_mut() {
            Ok(mut nav) => nav.initialize(&mut self.binder),
            Err(_) => {
                warn!("Navigation initialization skipped: lifecycle busy");
                InitReport::default()
            }
        }
    }
}

// ========================
// DOM view
// ========================

/// `NavigationView` over the live document
pub struct DomView {
    window: Window,
    document: Document,
}

fn dom_error(operation: &str, value: JsValue) -> NavError {
    NavError::Dom(format!("{} failed: {:?}", operation, value))
}

impl NavigationView for DomView {
    type Element = Element;

    fn location(&self) -> Option<String> {
        self.window.location().href().ok()
    }

    fn query(&self, selector: &str) -> NavResult<Option<Element>> {
        self.document
            .query_selector(selector)
            .map_err(|_| NavError::InvalidSelector(selector.to_string()))
    }

    fn query_all(&self, scope: &Element, selector: &str) -> NavResult<Vec<Element>> {
        let list = scope
            .query_selector_all(selector)
            .map_err(|_| NavError::InvalidSelector(selector.to_string()))?;
        Ok((0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn closest(&self, element: &Element, selector: &str) -> NavResult<Option<Element>> {
        element
            .closest(selector)
            .map_err(|_| NavError::InvalidSelector(selector.to_string()))
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &Node = node;
        ancestor.contains(Some(node))
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&mut self, element: &Element, name: &str, value: &str) -> NavResult<()> {
        element
            .set_attribute(name, value)
            .map_err(|e| dom_error("setAttribute", e))
    }

    fn remove_attribute(&mut self, element: &Element, name: &str) -> NavResult<()> {
        element
            .remove_attribute(name)
            .map_err(|e| dom_error("removeAttribute", e))
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&mut self, element: &Element, class: &str) -> NavResult<()> {
        element
            .class_list()
            .add_1(class)
            .map_err(|e| dom_error("classList.add", e))
    }

    fn remove_class(&mut self, element: &Element, class: &str) -> NavResult<()> {
        element
            .class_list()
            .remove_1(class)
            .map_err(|e| dom_error("classList.remove", e))
    }

    fn focus(&mut self, element: &Element) -> NavResult<()> {
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => html.focus().map_err(|e| dom_error("focus", e)),
            None => Ok(()),
        }
    }
}

// ========================
// Listener wiring
// ========================

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) -> NavResult<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref::<js_sys::Function>())
            .map_err(|e| NavError::Listener(format!("{}: {:?}", event, e)))?;
        Ok(Self {
            target,
            event,
            callback,
        })
    }

    fn detach(&self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref::<js_sys::Function>())
        {
            debug!("Failed to detach {} listener: {:?}", self.event, e);
        }
    }
}

/// Attaches closures that forward DOM events to the shared lifecycle
pub struct WebBinder {
    nav: Weak<RefCell<Navigation<DomView>>>,
    document: Document,
    listeners: Vec<Listener>,
}

impl EventBinder<Element> for WebBinder {
    fn bind_dropdown(&mut self, parts: &DropdownParts<Element>) -> NavResult<()> {
        let nav = self.nav.clone();
        let trigger = parts.trigger.clone();
        let trigger_listener = Listener::attach(parts.trigger.clone().into(), "click", move |event: Event| {
            let outcome = with_navigation(&nav, |nav| nav.on_trigger_click(&trigger));
            apply_outcome(&event, outcome.unwrap_or_default());
        })?;

        let nav = self.nav.clone();
        let menu = parts.menu.clone();
        let menu_listener = Listener::attach(parts.menu.clone().into(), "click", move |event: Event| {
            let Some(target) = event_element(&event) else {
                return;
            };
            let outcome = with_navigation(&nav, |nav| nav.on_menu_click(&menu, &target));
            apply_outcome(&event, outcome.unwrap_or_default());
        })
        .inspect_err(|_| trigger_listener.detach())?;

        self.listeners.push(trigger_listener);
        self.listeners.push(menu_listener);
        Ok(())
    }

    fn bind_document(&mut self) -> NavResult<()> {
        let nav = self.nav.clone();
        let click_listener = Listener::attach(self.document.clone().into(), "click", move |event: Event| {
            let target = event_element(&event);
            with_navigation(&nav, |nav| nav.on_document_click(target.as_ref()));
        })?;

        let nav = self.nav.clone();
        let key_listener = Listener::attach(self.document.clone().into(), "keydown", move |event: Event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                return;
            };
            with_navigation(&nav, |nav| nav.on_keydown(&key));
        })
        .inspect_err(|_| click_listener.detach())?;

        self.listeners.push(click_listener);
        self.listeners.push(key_listener);
        Ok(())
    }

    fn release_all(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
    }
}

fn with_navigation<T>(
    nav: &Weak<RefCell<Navigation<DomView>>>,
    f: impl FnOnce(&mut Navigation<DomView>) -> T,
) -> Option<T> {
    let nav = nav.upgrade()?;
    let Ok(mut nav) = nav.try_borrow_mut() else {
        warn!("Navigation event dropped: lifecycle busy");
        return None;
    };
    Some(f(&mut nav))
}

/// Element the event was dispatched to; text nodes resolve to their parent
fn event_element(event: &Event) -> Option<Element> {
    let target = event.target()?;
    match target.dyn_into::<Element>() {
        Ok(element) => Some(element),
        Err(other) => other.dyn_into::<Node>().ok()?.parent_element(),
    }
}

fn apply_outcome(event: &Event, outcome: EventOutcome) {
    if outcome.prevent_default {
        event.prevent_default();
    }
    if outcome.stop_propagation {
        event.stop_propagation();
    }
}

// ========================
// Console logging
// ========================

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug => console::debug_1(&line),
            Level::Trace => console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Route `log` records to the browser console unless a logger is already set
fn init_logging(level: log::LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
