//! Device power actions.

use crux_core::Command;

use crate::ajax_post;
use crate::events::Event;
use crate::model::Model;
use crate::protocol::{self, DeviceReply};
use crate::types::RebootState;
use crate::Effect;

pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Reboot => reboot(model),
        Event::RebootResponse(reply) => on_reboot_reply(reply, model),
        _ => unreachable!("Non-device event routed to device handler"),
    }
}

/// Ask the device to restart. The panel takes over immediately since the
/// link is about to go down either way.
fn reboot(model: &mut Model) -> Command<Effect, Event> {
    if model.locked() || model.reboot != RebootState::Idle {
        return Command::done();
    }

    log::info!("requesting device reboot");
    model.reboot = RebootState::Requested;
    model.show_panel(
        "Rebooting",
        "Please wait while the device restarts. This page will reload shortly \
         unless the IP or WiFi settings changed.",
    );
    ajax_post!(model, &protocol::reboot_request(), Event::RebootResponse)
}

/// The answer only refines the panel text. `Done` is reached either way and
/// tells the shell to schedule the page reload, a device that went quiet is
/// most likely already restarting.
fn on_reboot_reply(reply: DeviceReply, model: &mut Model) -> Command<Effect, Event> {
    model.stop_loading();
    if model.reboot != RebootState::Requested {
        return Command::done();
    }

    if !reply.success {
        log::warn!(
            "reboot request not confirmed: {}",
            reply.message.as_deref().unwrap_or("no message")
        );
        model.show_panel(
            "Reboot failed",
            "The device did not confirm the restart. The page reloads anyway; \
             if it comes back unchanged, try again.",
        );
    }
    model.reboot = RebootState::Done { success: reply.success };
    crux_core::render::render()
}
