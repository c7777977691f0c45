mod device;
mod firmware;
mod form;
mod nav;

use crux_core::Command;

use crate::events::Event;
use crate::model::Model;
use crate::Effect;

/// Top-level dispatcher, grouping events by the handler that owns them
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        // Navigation domain
        Event::Initialize | Event::SelectTab { .. } => nav::handle(event, model),

        // Form domain
        Event::FieldEdited { .. }
        | Event::Save
        | Event::SyncResponse(_)
        | Event::ClearSaveMessage => form::handle(event, model),

        // Device control domain
        Event::Reboot | Event::RebootResponse(_) => device::handle(event, model),

        // Firmware update domain
        Event::StartFirmwareUpdate { .. }
        | Event::PrepareResponse(_)
        | Event::UpdatePollTick
        | Event::PollResponse(_)
        | Event::UploadProgress(_)
        | Event::UploadResponse(_) => firmware::handle(event, model),
    }
}
