//! Navigation lifecycle - the entry point tying marker and dropdowns together

use log::{debug, warn};

use crate::config::NavConfig;
use crate::dropdown::{DropdownController, DropdownState};
use crate::error::NavResult;
use crate::marker;
use crate::view::{EventBinder, EventOutcome, NavigationView};

/// Summary of one `initialize` pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Links marked active
    pub active_links: usize,
    /// Dropdowns wired during this pass
    pub newly_wired: usize,
    /// Document listeners were installed during this pass
    pub document_listeners_installed: bool,
    /// Steps that failed and were logged
    pub failures: usize,
}

/// Owns the view, configuration and all wiring state for one page.
///
/// `initialize` can run any number of times: document listeners are bound
/// once per lifecycle and each dropdown once per trigger element.
pub struct Navigation<V: NavigationView> {
    view: V,
    config: NavConfig,
    dropdowns: DropdownController<V::Element>,
    document_listeners: bool,
}

impl<V: NavigationView> Navigation<V> {
    /// Create a lifecycle over `view`
    pub fn new(view: V, config: NavConfig) -> Self {
        Self {
            view,
            config,
            dropdowns: DropdownController::new(),
            document_listeners: false,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Replace the configuration used by later calls
    pub fn set_config(&mut self, config: NavConfig) {
        self.config = config;
    }

    pub fn dropdowns(&self) -> &DropdownController<V::Element> {
        &self.dropdowns
    }

    /// State of the dropdown owning `trigger`, if it is wired
    pub fn dropdown_state(&self, trigger: &V::Element) -> Option<DropdownState> {
        self.dropdowns.state(trigger)
    }

    pub fn document_listeners_installed(&self) -> bool {
        self.document_listeners
    }

    // ========================
    // Initialization
    // ========================

    /// Mark the active link, bind document listeners, then wire dropdowns.
    ///
    /// Failures are logged and counted, never propagated; a failing step
    /// does not prevent the next one from running.
    pub fn initialize<B: EventBinder<V::Element> + ?Sized>(&mut self, binder: &mut B) -> InitReport {
        let mut report = InitReport::default();

        match self.mark_active() {
            Ok(count) => report.active_links = count,
            Err(e) => {
                warn!("Active link marking failed: {}", e);
                report.failures += 1;
            }
        }

        match self.install_document_listeners(binder) {
            Ok(installed) => report.document_listeners_installed = installed,
            Err(e) => {
                warn!("Document listener setup failed: {}", e);
                report.failures += 1;
            }
        }

        match self.setup_dropdowns(binder) {
            Ok(wired) => report.newly_wired = wired,
            Err(e) => {
                warn!("Dropdown setup failed: {}", e);
                report.failures += 1;
            }
        }

        debug!("Navigation initialized: {:?}", report);
        report
    }

    /// Run the active-link marker once
    pub fn mark_active(&mut self) -> NavResult<usize> {
        marker::mark_active_links(&mut self.view, &self.config)
    }

    /// Bind the document click and keydown listeners unless already bound.
    /// Returns whether they were bound by this call.
    pub fn install_document_listeners<B: EventBinder<V::Element> + ?Sized>(&mut self, binder: &mut B) -> NavResult<bool> {
        if self.document_listeners {
            return Ok(false);
        }
        binder.bind_document()?;
        self.document_listeners = true;
        Ok(true)
    }

    /// Wire dropdowns not wired yet
    pub fn setup_dropdowns<B: EventBinder<V::Element> + ?Sized>(&mut self, binder: &mut B) -> NavResult<usize> {
        self.dropdowns.setup(&mut self.view, &self.config, binder)
    }

    /// Release every listener and forget all wiring
    pub fn reset<B: EventBinder<V::Element> + ?Sized>(&mut self, binder: &mut B) {
        binder.release_all();
        self.dropdowns.clear();
        self.document_listeners = false;
    }

    // ========================
    // Event entry points
    // ========================

    pub fn on_trigger_click(&mut self, trigger: &V::Element) -> EventOutcome {
        self.dropdowns
            .on_trigger_click(&mut self.view, &self.config, trigger)
            .unwrap_or_else(|e| {
                warn!("Trigger click failed: {}", e);
                EventOutcome::proceed()
            })
    }

    pub fn on_menu_click(&mut self, menu: &V::Element, target: &V::Element) -> EventOutcome {
        self.dropdowns
            .on_menu_click(&mut self.view, &self.config, menu, target)
            .unwrap_or_else(|e| {
                warn!("Menu click failed: {}", e);
                EventOutcome::proceed()
            })
    }

    pub fn on_document_click(&mut self, target: Option<&V::Element>) {
        if let Err(e) = self.dropdowns.on_document_click(&mut self.view, &self.config, target) {
            warn!("Outside click handling failed: {}", e);
        }
    }

    pub fn on_keydown(&mut self, key: &str) {
        if let Err(e) = self.dropdowns.on_keydown(&mut self.view, &self.config, key) {
            warn!("Keydown handling failed: {}", e);
        }
    }
}
