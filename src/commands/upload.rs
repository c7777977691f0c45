//! Firmware upload command definitions.
//!
//! These types define the interface between the Core and the Shell for the
//! image transfer. The file handle never enters the core; the shell keeps it
//! from the file input and streams it as multipart form data when asked,
//! reporting transfer progress through separate events.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

// What the Shell needs to perform the transfer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadOperation {
    pub url: String,
    /// Name of the multipart form field carrying the image.
    pub field_name: String,
}

// The outcome of the transfer (shell tells us what happened)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum UploadOutput {
    Done { status: u16, body: Vec<u8> },
    Error { message: String },
}

impl Operation for UploadOperation {
    type Output = UploadOutput;
}

/// Command-based firmware upload API
pub struct FirmwareUpload<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> FirmwareUpload<Effect, Event>
where
    Effect: Send + From<crux_core::Request<UploadOperation>> + 'static,
    Event: Send + 'static,
{
    /// Send the picked image file to the given endpoint
    pub fn send(
        url: impl Into<String>,
        field_name: impl Into<String>,
    ) -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(UploadOperation {
            url: url.into(),
            field_name: field_name.into(),
        })
    }
}

/// Request builder for upload operations
#[must_use]
pub struct RequestBuilder<Effect, Event> {
    operation: UploadOperation,
    _effect: PhantomData<Effect>,
    _event: PhantomData<fn() -> Event>,
}

impl<Effect, Event> RequestBuilder<Effect, Event>
where
    Effect: Send + From<crux_core::Request<UploadOperation>> + 'static,
    Event: Send + 'static,
{
    fn new(operation: UploadOperation) -> Self {
        Self {
            operation,
            _effect: PhantomData,
            _event: PhantomData,
        }
    }

    /// Finish into a Command-layer builder the handlers can chain
    pub fn build(
        self,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = UploadOutput>>
    {
        command::RequestBuilder::new(move |ctx| async move {
            Command::request_from_shell(self.operation)
                .into_future(ctx)
                .await
        })
    }
}
