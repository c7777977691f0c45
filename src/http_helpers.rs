//! HTTP plumbing between the core and the device endpoints.
//!
//! Every response, good or bad, is normalized into a [`DeviceReply`] here so
//! the update handlers only ever deal with one reply shape.

use crux_http::Response;

use crate::{
    commands::upload::UploadOutput,
    protocol::{self, DeviceReply, NO_RESPONSE},
};

/// Base URL for the device endpoints.
///
/// NOTE: This is a dummy prefix required because `crux_http` (v0.16.0-rc2)
/// requires absolute URLs and rejects relative paths
/// (`RelativeUrlWithoutBase` error). The shell strips this prefix before
/// issuing the request via `fetch()`, keeping requests relative to whatever
/// host and port the page was loaded from.
pub const BASE_URL: &str = "https://relative";

/// The configuration endpoint all form and control traffic goes through.
pub const AJAX_ENDPOINT: &str = "/ajax";

/// The firmware image endpoint, multipart upload handled by the shell.
pub const UPLOAD_ENDPOINT: &str = "/upload";

/// Prepends [`BASE_URL`] to an endpoint path.
///
/// # Example
/// ```
/// use luxnode_ui_core::http_helpers::build_url;
/// let url = build_url("/ajax");
/// assert_eq!(url, "https://relative/ajax");
/// ```
pub fn build_url(endpoint: &str) -> String {
    format!("{BASE_URL}{endpoint}")
}

/// Error text for a non-2xx response: the body if it carries one, the status
/// code otherwise.
pub fn error_message(response: &mut Response<Vec<u8>>) -> String {
    let status = response.status().to_string();

    match response.take_body() {
        Some(body) if !body.is_empty() => String::from_utf8_lossy(&body).into_owned(),
        _ => format!("HTTP {status}"),
    }
}

/// Normalize the outcome of a configuration request into a [`DeviceReply`].
///
/// Transport errors and HTTP failures become unsuccessful replies with a
/// synthesized message; 2xx bodies go through the reply parser.
pub fn reply_from_http(result: crux_http::Result<Response<Vec<u8>>>) -> DeviceReply {
    match result {
        Ok(mut response) => {
            if !response.status().is_success() {
                return DeviceReply::failure(error_message(&mut response));
            }
            match response.take_body() {
                Some(body) => protocol::parse_reply(&body),
                None => DeviceReply::failure(NO_RESPONSE),
            }
        }
        Err(e) => DeviceReply::failure(format!("{NO_RESPONSE} ({e})")),
    }
}

/// Normalize the outcome of the shell-side firmware upload.
pub fn reply_from_upload(output: UploadOutput) -> DeviceReply {
    match output {
        UploadOutput::Done { status, body } => {
            if (200..300).contains(&status) {
                protocol::parse_reply(&body)
            } else if body.is_empty() {
                DeviceReply::failure(format!("HTTP {status}"))
            } else {
                DeviceReply::failure(String::from_utf8_lossy(&body).into_owned())
            }
        }
        UploadOutput::Error { message } => {
            DeviceReply::failure(format!("{NO_RESPONSE} ({message})"))
        }
    }
}
