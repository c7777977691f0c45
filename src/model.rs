use std::collections::BTreeMap;

use crux_core::Command;
use serde::{Deserialize, Serialize};

use crate::{
    types::{ControlValue, Panel, RebootState, Timings, UpdateSession},
    Effect, Event,
};

/// Shown when a sync fails without the device supplying its own message.
pub const GENERIC_FAILURE: &str =
    "The device returned an unexpected response. Reload the page to try again.";

/// The whole page state. Doubles as the view model, the shell renders it
/// directly.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Model {
    // Navigation
    pub active_tab: usize,
    /// Tab requested but not yet confirmed by the device.
    pub pending_tab: usize,
    /// Once set, every interaction except a page reload is refused.
    pub error_state: Option<String>,

    // Form content
    pub values: BTreeMap<String, ControlValue>,
    /// Read-only element texts, keyed by element name.
    pub display: BTreeMap<String, String>,
    /// Mode-dependent row groups, keyed by group name.
    pub visibility: BTreeMap<String, bool>,
    /// Transient text on the active tab's save button.
    pub save_message: Option<String>,

    /// Content of the reserved tab 0 panel, when it has been taken over.
    pub panel: Option<Panel>,

    // Device operations
    pub reboot: RebootState,
    pub update_session: UpdateSession,
    /// Name of the image file picked for the running update session.
    pub firmware_file: Option<String>,

    pub is_loading: bool,

    /// Cadences for the timers the shell runs.
    pub timings: Timings,
}

impl Model {
    pub fn start_loading(&mut self) {
        self.is_loading = true;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
    }

    /// Whether the session is stuck in the fatal error panel.
    pub fn locked(&self) -> bool {
        self.error_state.is_some()
    }

    /// Take over tab 0 with the given content and reveal it.
    pub fn show_panel(&mut self, title: impl Into<String>, text: impl Into<String>) {
        self.panel = Some(Panel::new(title, text));
        self.active_tab = 0;
    }

    /// Drop into the fatal error panel. The message defaults to a generic
    /// one when the device did not supply any.
    pub fn enter_error_state(&mut self, message: Option<String>) {
        self.stop_loading();
        let text = message.unwrap_or_else(|| GENERIC_FAILURE.to_string());
        log::error!("entering error state: {text}");
        self.error_state = Some(text.clone());
        self.show_panel("Error", text);
    }

    pub fn enter_error_state_and_render(
        &mut self,
        message: Option<String>,
    ) -> Command<Effect, Event> {
        self.enter_error_state(message);
        crux_core::render::render()
    }
}
