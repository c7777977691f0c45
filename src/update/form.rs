//! Form synchronization: saving the active tab and applying device replies.
//!
//! Replies are authoritative. A field only changes when the device confirms
//! it, and the reply's `page` decides which tab is revealed, so the page can
//! never show a tab the device refused.

use crux_core::Command;
use serde_json::Value;

use crate::ajax_post;
use crate::events::Event;
use crate::model::Model;
use crate::protocol::{self, DeviceReply};
use crate::schema::{self, FieldKind, FieldSpec};
use crate::types::ControlValue;
use crate::update_field;
use crate::Effect;

pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::FieldEdited { name, value } => edit_field(name, value, model),
        Event::Save => save(model),
        Event::SyncResponse(reply) => apply_sync_reply(reply, model),
        Event::ClearSaveMessage => update_field!(model.save_message, None),
        _ => unreachable!("Non-form event routed to form handler"),
    }
}

/// Store a user edit. Read-only elements and shapes that do not fit the
/// field are refused; mirrors keep showing the last confirmed value.
fn edit_field(name: String, value: ControlValue, model: &mut Model) -> Command<Effect, Event> {
    if model.locked() {
        return Command::done();
    }
    let Some(spec) = schema::field(&name) else {
        log::debug!("ignoring edit of unknown field '{name}'");
        return Command::done();
    };
    if !shape_fits(&spec.kind, &value) {
        log::debug!("ignoring ill-shaped edit of field '{name}'");
        return Command::done();
    }

    let mode = value.text().trim().parse::<i64>().ok();
    model.values.insert(name.clone(), value);
    refresh_visibility(&name, mode, model);
    crux_core::render::render()
}

fn shape_fits(kind: &FieldKind, value: &ControlValue) -> bool {
    match kind {
        FieldKind::Display | FieldKind::DisplayQuad => false,
        FieldKind::Text { .. } | FieldKind::Number | FieldKind::Choice { .. } => {
            matches!(value, ControlValue::Scalar(_))
        }
        FieldKind::Flag => matches!(value, ControlValue::Flag(_)),
        FieldKind::Quad { .. } => matches!(value, ControlValue::Quad(_)),
    }
}

/// Serialize the active tab and send it.
fn save(model: &mut Model) -> Command<Effect, Event> {
    if model.locked() {
        return Command::done();
    }
    let Some(tab) = schema::tab(model.active_tab) else {
        return Command::done();
    };
    if !tab.savable {
        log::debug!("tab {} has no save action", model.active_tab);
        return Command::done();
    }

    let body = protocol::save_request(tab, model.active_tab, &model.values);
    ajax_post!(model, &body, Event::SyncResponse)
}

/// Apply a reply to a selector or save request.
///
/// An unsuccessful reply drops the page into the error state before any
/// field is touched, a half-applied mix of old and new values never occurs.
fn apply_sync_reply(reply: DeviceReply, model: &mut Model) -> Command<Effect, Event> {
    model.stop_loading();

    if !reply.success {
        return model.enter_error_state_and_render(reply.message);
    }

    if let Some(message) = reply.message {
        model.save_message = Some(message);
    }

    let target = reply.page.unwrap_or(model.pending_tab);
    if schema::tab(target).is_some() {
        model.active_tab = target;
        model.pending_tab = target;
    } else {
        log::warn!("reply names unknown tab {target}, staying on {}", model.active_tab);
    }
    log::debug!(
        "applying reply with {} field(s) for tab {}",
        reply.fields.len(),
        model.active_tab
    );

    apply_fields(&reply.fields, model);
    crux_core::render::render()
}

/// Apply every field update in a reply. Names the schema does not know are
/// logged and skipped.
fn apply_fields(fields: &serde_json::Map<String, Value>, model: &mut Model) {
    for (name, value) in fields {
        match schema::field(name) {
            Some(spec) => apply_field(spec, value, model),
            None => log::debug!("ignoring unknown field '{name}' in reply"),
        }
    }
}

fn apply_field(spec: &'static FieldSpec, value: &Value, model: &mut Model) {
    let name = spec.name;
    match &spec.kind {
        FieldKind::Display => {
            model
                .display
                .insert(name.to_string(), protocol::value_as_text(value));
        }
        FieldKind::DisplayQuad => match protocol::quad_values(value) {
            Some(parts) => {
                model.display.insert(name.to_string(), parts.join("."));
            }
            None => log::debug!("field '{name}' is not a 4-element array, skipping"),
        },
        FieldKind::Quad { mirror } => match protocol::quad_values(value) {
            Some(parts) => {
                if *mirror {
                    model.display.insert(format!("{name}T"), parts.join("."));
                }
                model.values.insert(name.to_string(), ControlValue::Quad(parts));
            }
            None => log::debug!("field '{name}' is not a 4-element array, skipping"),
        },
        FieldKind::Flag => {
            let set = protocol::value_as_i64(value) == Some(1);
            model.values.insert(name.to_string(), ControlValue::Flag(set));
        }
        FieldKind::Choice { options } => {
            let selected = protocol::value_as_text(value);
            if options.contains(&selected.as_str()) {
                model
                    .values
                    .insert(name.to_string(), ControlValue::Scalar(selected));
            } else {
                log::debug!("field '{name}' has no option '{selected}', keeping selection");
            }
        }
        FieldKind::Text { mirror } => {
            let text = protocol::value_as_text(value);
            if *mirror {
                model.display.insert(name.to_string(), text.clone());
            }
            model.values.insert(name.to_string(), ControlValue::Scalar(text));
        }
        FieldKind::Number => {
            let text = match protocol::value_as_i64(value) {
                Some(n) => n.to_string(),
                None => protocol::value_as_text(value),
            };
            model.values.insert(name.to_string(), ControlValue::Scalar(text));
        }
    }

    refresh_visibility(name, protocol::value_as_i64(value), model);
}

/// Re-evaluate the row groups hanging off a mode field. Visibility is a pure
/// function of the mode value, whether it came from an edit or a reply.
fn refresh_visibility(name: &str, mode: Option<i64>, model: &mut Model) {
    for rule in schema::rules_for(name) {
        let active = mode == Some(rule.trigger);
        for group in rule.shows {
            model.visibility.insert(group.to_string(), active);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ControlValue;
    use serde_json::json;

    fn ok_reply(page: usize, fields: serde_json::Value) -> DeviceReply {
        DeviceReply {
            success: true,
            page: Some(page),
            fields: fields.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    mod applying_replies {
        use super::*;

        #[test]
        fn reply_page_decides_the_revealed_tab() {
            let mut model = Model { pending_tab: 3, is_loading: true, ..Default::default() };

            let _ = handle(Event::SyncResponse(ok_reply(3, json!({}))), &mut model);

            assert_eq!(model.active_tab, 3);
            assert_eq!(model.pending_tab, 3);
            assert!(!model.is_loading);
        }

        #[test]
        fn missing_page_falls_back_to_the_pending_tab() {
            let mut model = Model { pending_tab: 2, ..Default::default() };
            let reply = DeviceReply { success: true, ..Default::default() };

            let _ = handle(Event::SyncResponse(reply), &mut model);

            assert_eq!(model.active_tab, 2);
        }

        #[test]
        fn unknown_page_leaves_the_tab_alone() {
            let mut model = Model { active_tab: 3, pending_tab: 3, ..Default::default() };

            let _ = handle(Event::SyncResponse(ok_reply(99, json!({}))), &mut model);

            assert_eq!(model.active_tab, 3);
        }

        #[test]
        fn text_and_flag_fields_are_applied() {
            let mut model = Model::default();
            let reply = ok_reply(3, json!({ "nodeName": "LuxNode", "dhcpEnable": 1 }));

            let _ = handle(Event::SyncResponse(reply), &mut model);

            assert_eq!(
                model.values.get("nodeName"),
                Some(&ControlValue::Scalar("LuxNode".to_string()))
            );
            assert_eq!(model.values.get("dhcpEnable"), Some(&ControlValue::Flag(true)));
            // nodeName mirrors into its read-only twin
            assert_eq!(model.display.get("nodeName").map(String::as_str), Some("LuxNode"));
        }

        #[test]
        fn checkbox_decoding_accepts_a_quoted_one() {
            let mut model = Model::default();
            let reply = ok_reply(2, json!({ "standAloneEnable": "1", "dhcpEnable": 0 }));

            let _ = handle(Event::SyncResponse(reply), &mut model);

            assert_eq!(
                model.values.get("standAloneEnable"),
                Some(&ControlValue::Flag(true))
            );
            assert_eq!(model.values.get("dhcpEnable"), Some(&ControlValue::Flag(false)));
        }

        #[test]
        fn quads_fill_four_inputs_and_their_mirror() {
            let mut model = Model::default();
            let reply = ok_reply(3, json!({ "ipAddress": [2, 0, 0, 10] }));

            let _ = handle(Event::SyncResponse(reply), &mut model);

            let expected = ControlValue::Quad(["2".into(), "0".into(), "0".into(), "10".into()]);
            assert_eq!(model.values.get("ipAddress"), Some(&expected));
            assert_eq!(
                model.display.get("ipAddressT").map(String::as_str),
                Some("2.0.0.10")
            );
        }

        #[test]
        fn display_quads_render_dotted() {
            let mut model = Model::default();
            let reply = ok_reply(1, json!({ "bcAddress": [2, 255, 255, 255] }));

            let _ = handle(Event::SyncResponse(reply), &mut model);

            assert_eq!(
                model.display.get("bcAddress").map(String::as_str),
                Some("2.255.255.255")
            );
            assert!(model.values.get("bcAddress").is_none());
        }

        #[test]
        fn select_without_matching_option_keeps_the_selection() {
            let mut model = Model::default();
            model
                .values
                .insert("portAmode".to_string(), ControlValue::Scalar("1".to_string()));

            let _ = handle(
                Event::SyncResponse(ok_reply(4, json!({ "portAmode": "7" }))),
                &mut model,
            );

            assert_eq!(
                model.values.get("portAmode"),
                Some(&ControlValue::Scalar("1".to_string()))
            );
        }

        #[test]
        fn unknown_fields_are_ignored() {
            let mut model = Model::default();

            let _ = handle(
                Event::SyncResponse(ok_reply(1, json!({ "mystery": "x" }))),
                &mut model,
            );

            assert!(model.values.is_empty());
            assert!(model.display.is_empty());
        }

        #[test]
        fn mode_values_toggle_dependent_groups() {
            let mut model = Model::default();

            let _ = handle(
                Event::SyncResponse(ok_reply(4, json!({ "portAmode": "3" }))),
                &mut model,
            );
            assert_eq!(model.visibility.get("portApix"), Some(&true));
            assert_eq!(model.visibility.get("DmxInBcAddrA"), Some(&false));

            let _ = handle(
                Event::SyncResponse(ok_reply(4, json!({ "portAmode": "2" }))),
                &mut model,
            );
            assert_eq!(model.visibility.get("portApix"), Some(&false));
            assert_eq!(model.visibility.get("DmxInBcAddrA"), Some(&true));
        }

        #[test]
        fn overlapping_replies_apply_in_arrival_order() {
            let mut model = Model::default();

            let _ = handle(
                Event::SyncResponse(ok_reply(3, json!({ "nodeName": "First" }))),
                &mut model,
            );
            let _ = handle(
                Event::SyncResponse(ok_reply(3, json!({ "nodeName": "Second" }))),
                &mut model,
            );

            assert_eq!(
                model.values.get("nodeName"),
                Some(&ControlValue::Scalar("Second".to_string()))
            );
        }

        #[test]
        fn save_confirmations_show_their_message() {
            let mut model = Model::default();
            let reply = DeviceReply {
                success: true,
                message: Some("Settings saved.".to_string()),
                page: Some(3),
                ..Default::default()
            };

            let _ = handle(Event::SyncResponse(reply), &mut model);
            assert_eq!(model.save_message.as_deref(), Some("Settings saved."));

            let _ = handle(Event::ClearSaveMessage, &mut model);
            assert!(model.save_message.is_none());
        }
    }

    mod failures {
        use super::*;

        #[test]
        fn failure_locks_the_page_before_touching_fields() {
            let mut model = Model::default();
            model
                .values
                .insert("nodeName".to_string(), ControlValue::Scalar("Old".to_string()));
            model.active_tab = 3;

            let mut reply = DeviceReply::failure("Device restarting");
            reply.fields.insert("nodeName".to_string(), json!("New"));

            let _ = handle(Event::SyncResponse(reply), &mut model);

            assert_eq!(model.error_state.as_deref(), Some("Device restarting"));
            assert_eq!(model.active_tab, 0);
            assert_eq!(
                model.values.get("nodeName"),
                Some(&ControlValue::Scalar("Old".to_string()))
            );
            let panel = model.panel.as_ref().unwrap();
            assert_eq!(panel.text, "Device restarting");
        }

        #[test]
        fn failure_without_message_uses_the_generic_text() {
            let mut model = Model::default();
            let reply = DeviceReply { success: false, ..Default::default() };

            let _ = handle(Event::SyncResponse(reply), &mut model);

            assert_eq!(
                model.error_state.as_deref(),
                Some(crate::model::GENERIC_FAILURE)
            );
        }

        #[test]
        fn locked_page_refuses_to_save() {
            let mut model = Model::default();
            model.enter_error_state(None);

            let _ = handle(Event::Save, &mut model);

            assert!(!model.is_loading);
        }
    }

    mod saving {
        use super::*;

        #[test]
        fn save_on_a_savable_tab_starts_loading() {
            let mut model = Model { active_tab: 3, pending_tab: 3, ..Default::default() };

            let _ = handle(Event::Save, &mut model);

            assert!(model.is_loading);
        }

        #[test]
        fn save_on_a_read_only_tab_is_a_no_op() {
            let mut model = Model { active_tab: 1, pending_tab: 1, ..Default::default() };

            let _ = handle(Event::Save, &mut model);

            assert!(!model.is_loading);
        }
    }

    mod editing {
        use super::*;

        fn edit(name: &str, value: ControlValue, model: &mut Model) {
            let _ = handle(
                Event::FieldEdited { name: name.to_string(), value },
                model,
            );
        }

        #[test]
        fn edits_replace_the_stored_value() {
            let mut model = Model::default();

            edit("nodeName", ControlValue::Scalar("New name".into()), &mut model);

            assert_eq!(
                model.values.get("nodeName"),
                Some(&ControlValue::Scalar("New name".to_string()))
            );
        }

        #[test]
        fn edits_leave_the_mirror_on_the_confirmed_value() {
            let mut model = Model::default();
            model
                .display
                .insert("ipAddressT".to_string(), "2.0.0.10".to_string());

            edit(
                "ipAddress",
                ControlValue::Quad(["10".into(), "0".into(), "0".into(), "1".into()]),
                &mut model,
            );

            assert_eq!(
                model.display.get("ipAddressT").map(String::as_str),
                Some("2.0.0.10")
            );
        }

        #[test]
        fn mode_edits_reveal_dependent_groups_immediately() {
            let mut model = Model::default();

            edit("portBmode", ControlValue::Scalar("3".into()), &mut model);
            assert_eq!(model.visibility.get("portBpix"), Some(&true));

            edit("portBmode", ControlValue::Scalar("0".into()), &mut model);
            assert_eq!(model.visibility.get("portBpix"), Some(&false));
        }

        #[test]
        fn read_only_and_unknown_fields_refuse_edits() {
            let mut model = Model::default();

            edit("wifiStatus", ControlValue::Scalar("faked".into()), &mut model);
            edit("mystery", ControlValue::Scalar("x".into()), &mut model);

            assert!(model.values.is_empty());
            assert!(model.display.is_empty());
        }

        #[test]
        fn ill_shaped_edits_are_refused() {
            let mut model = Model::default();

            edit("dhcpEnable", ControlValue::Scalar("on".into()), &mut model);
            edit("nodeName", ControlValue::Flag(true), &mut model);

            assert!(model.values.is_empty());
        }

        #[test]
        fn locked_page_refuses_edits() {
            let mut model = Model::default();
            model.enter_error_state(None);

            edit("nodeName", ControlValue::Scalar("x".into()), &mut model);

            assert!(model.values.is_empty());
        }
    }
}
