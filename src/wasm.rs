//! WebAssembly bindings for the configuration page shell.
//!
//! The JavaScript side serializes events with bincode, feeds them through
//! [`process_event`], resolves finished effects via [`handle_response`] and
//! pulls the current [`Model`](crate::Model) snapshot with [`view`].

use lazy_static::lazy_static;
use wasm_bindgen::prelude::wasm_bindgen;

use crux_core::{bridge::Bridge, Core};

use crate::App;

lazy_static! {
    static ref CORE: Bridge<App> = Bridge::new(Core::new());
}

#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_log::init_with_level(log::Level::Debug).expect("logger init failed");
}

/// Feed one bincode-serialized [`Event`](crate::Event) into the core.
///
/// Returns the bincode-serialized effect requests the shell must resolve.
#[wasm_bindgen]
pub fn process_event(event_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    CORE.update(event_bytes, &mut effects)
        .expect("event processing failed");
    effects
}

/// Hand the outcome of an effect back to the core.
///
/// Takes the effect id and the bincode-serialized response, returns any
/// follow-up effect requests.
#[wasm_bindgen]
pub fn handle_response(id: u32, response_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    CORE.resolve(
        crux_core::bridge::EffectId(id),
        response_bytes,
        &mut effects,
    )
    .expect("effect resolution failed");
    effects
}

/// Snapshot of the current view model, bincode-serialized.
#[wasm_bindgen]
pub fn view() -> Vec<u8> {
    let mut out = Vec::new();
    CORE.view(&mut out).expect("view serialization failed");
    out
}
