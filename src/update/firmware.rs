//! Firmware update orchestration.
//!
//! The session runs in phases: switch the device into update mode, probe the
//! updater until it answers, hand the image transfer to the shell, then hold
//! the outcome until the scheduled reload. Probes are strictly sequential, a
//! tick while the previous probe is unanswered does nothing.

use crux_core::Command;

use crate::events::Event;
use crate::http_helpers::{build_url, UPLOAD_ENDPOINT};
use crate::model::Model;
use crate::protocol::{self, DeviceReply};
use crate::types::UpdateSession;
use crate::{ajax_post, ajax_post_silent, UploadCmd};
use crate::Effect;

/// Multipart form field the firmware expects the image under.
const UPLOAD_FIELD: &str = "update";

pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::StartFirmwareUpdate { file_name } => start(file_name, model),
        Event::PrepareResponse(reply) => on_prepare_reply(reply, model),
        Event::UpdatePollTick => poll(model),
        Event::PollResponse(reply) => on_poll_reply(reply, model),
        Event::UploadProgress(percent) => on_progress(percent, model),
        Event::UploadResponse(reply) => on_upload_reply(reply, model),
        _ => unreachable!("Non-firmware event routed to firmware handler"),
    }
}

fn start(file_name: String, model: &mut Model) -> Command<Effect, Event> {
    if !model.update_session.can_start() {
        log::debug!("update already in progress, ignoring start");
        return Command::done();
    }
    if file_name.is_empty() {
        model.update_session = UpdateSession::Failed { reason: "No file selected.".to_string() };
        return crux_core::render::render();
    }

    log::info!("starting firmware update with {file_name}");
    model.firmware_file = Some(file_name);
    model.update_session = UpdateSession::Preparing;
    ajax_post!(model, &protocol::prepare_update_request(), Event::PrepareResponse)
}

/// The device acknowledges update mode by echoing `doUpdate: 1`. Anything
/// else means it stayed in normal operation, so the session must not start
/// probing or it would hammer a live node.
fn on_prepare_reply(reply: DeviceReply, model: &mut Model) -> Command<Effect, Event> {
    model.stop_loading();
    if model.update_session != UpdateSession::Preparing {
        return Command::done();
    }

    if reply.success && reply.do_update == Some(1) {
        log::info!("device is switching into update mode");
        model.update_session = UpdateSession::WaitingForDevice { attempt: 0, probing: false };
    } else {
        let reason = reply
            .message
            .unwrap_or_else(|| "Device refused to enter update mode.".to_string());
        log::error!("update preparation failed: {reason}");
        model.update_session = UpdateSession::Failed { reason };
    }
    crux_core::render::render()
}

/// One shell tick. Sends the next readiness probe unless one is still in
/// flight or the configured probe ceiling is reached.
fn poll(model: &mut Model) -> Command<Effect, Event> {
    let UpdateSession::WaitingForDevice { attempt, probing } = model.update_session else {
        return Command::done();
    };
    if probing {
        return Command::done();
    }

    let attempt = attempt + 1;
    if let Some(cap) = model.timings.max_update_polls {
        if attempt > cap {
            log::error!("device updater not reachable after {cap} probes");
            model.update_session = UpdateSession::Failed {
                reason: "Device did not become ready for the update.".to_string(),
            };
            return crux_core::render::render();
        }
    }

    log::debug!("probing device updater, attempt {attempt}");
    model.update_session = UpdateSession::WaitingForDevice { attempt, probing: true };
    ajax_post_silent!(model, &protocol::poll_update_request(), Event::PollResponse)
}

/// A successful probe hands the transfer to the shell. A failed one arms the
/// next tick; the updater usually needs a few seconds to come up.
fn on_poll_reply(reply: DeviceReply, model: &mut Model) -> Command<Effect, Event> {
    let UpdateSession::WaitingForDevice { attempt, probing: true } = model.update_session else {
        return Command::done();
    };

    if !reply.success {
        log::debug!("updater not ready yet (attempt {attempt})");
        model.update_session = UpdateSession::WaitingForDevice { attempt, probing: false };
        return crux_core::render::render();
    }

    log::info!("device updater is ready, uploading image");
    model.update_session = UpdateSession::Uploading { progress: 0 };
    Command::all([
        crux_core::render::render(),
        UploadCmd::send(build_url(UPLOAD_ENDPOINT), UPLOAD_FIELD)
            .build()
            .then_send(|output| {
                Event::UploadResponse(crate::http_helpers::reply_from_upload(output))
            }),
    ])
}

fn on_progress(percent: u8, model: &mut Model) -> Command<Effect, Event> {
    if let UpdateSession::Uploading { progress } = &mut model.update_session {
        *progress = percent.min(100);
        log::debug!("upload progress {percent}%");
        return crux_core::render::render();
    }
    Command::done()
}

/// Settle the session. Only the first outcome counts, so the reload the
/// shell schedules off `Completed` happens exactly once.
fn on_upload_reply(reply: DeviceReply, model: &mut Model) -> Command<Effect, Event> {
    if !matches!(model.update_session, UpdateSession::Uploading { .. }) {
        return Command::done();
    }

    if reply.success {
        let message = reply
            .message
            .unwrap_or_else(|| "Update complete. The device is restarting.".to_string());
        log::info!("firmware update complete: {message}");
        model.update_session = UpdateSession::Completed { message };
    } else {
        let reason = reply.message.unwrap_or_else(|| "Update failed!".to_string());
        log::error!("firmware update failed: {reason}");
        model.update_session = UpdateSession::Failed { reason };
    }
    crux_core::render::render()
}
