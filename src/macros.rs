/// Assigns model fields and renders only when at least one of them changed.
///
/// # Examples
///
/// One field:
/// ```ignore
/// update_field!(model.save_message, None)
/// ```
///
/// Several fields at once:
/// ```ignore
/// update_field!(
///     model.save_message, None;
///     model.is_loading, false
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multi-field arm, listed first so it wins the match
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single-field arm
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

// Macro bodies reach these through $crate
pub use crate::http_helpers::{build_url, reply_from_http, AJAX_ENDPOINT, BASE_URL};

/// Macro for POST requests against the configuration endpoint.
///
/// Serializes the body, sets the loading state and wraps the normalized
/// reply into the given response event. URLs carry the dummy
/// `https://relative` prefix; see [`BASE_URL`](crate::http_helpers::BASE_URL).
///
/// # Example
/// ```ignore
/// ajax_post!(model, &protocol::selector_request(tab), Event::SyncResponse)
/// ```
#[macro_export]
macro_rules! ajax_post {
    ($model:expr, $body:expr, $response_event:path) => {{
        $model.start_loading();
        match $crate::HttpCmd::post($crate::build_url($crate::AJAX_ENDPOINT))
            .header("Content-Type", "application/json")
            .body_json($body)
        {
            Ok(builder) => crux_core::Command::all([
                crux_core::render::render(),
                builder
                    .build()
                    .then_send(|result| $response_event($crate::reply_from_http(result))),
            ]),
            Err(e) => $model
                .enter_error_state_and_render(Some(format!("Failed to encode request: {e}"))),
        }
    }};
}

/// Silent variant of [`ajax_post!`] for background probing. Does not touch
/// the loading state and does not render before the reply arrives.
///
/// # Example
/// ```ignore
/// ajax_post_silent!(model, &protocol::poll_update_request(), Event::PollResponse)
/// ```
#[macro_export]
macro_rules! ajax_post_silent {
    ($model:expr, $body:expr, $response_event:path) => {{
        match $crate::HttpCmd::post($crate::build_url($crate::AJAX_ENDPOINT))
            .header("Content-Type", "application/json")
            .body_json($body)
        {
            Ok(builder) => builder
                .build()
                .then_send(|result| $response_event($crate::reply_from_http(result))),
            Err(e) => $model
                .enter_error_state_and_render(Some(format!("Failed to encode request: {e}"))),
        }
    }};
}
