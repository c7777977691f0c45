pub mod commands;
pub mod events;
pub mod http_helpers;
pub mod macros;
pub mod model;
pub mod protocol;
pub mod schema;
pub mod types;
pub mod update;

#[cfg(target_arch = "wasm32")]
pub mod wasm;


use crux_core::Command;

// Shell-facing re-exports
pub use crate::{
    commands::upload::{UploadOperation, UploadOutput},
    events::Event,
    http_helpers::{
        build_url, reply_from_http, reply_from_upload, AJAX_ENDPOINT, BASE_URL, UPLOAD_ENDPOINT,
    },
    model::Model,
    protocol::DeviceReply,
    types::*,
};
pub use crux_http::Result as HttpResult;

#[crux_macros::effect(typegen)]
pub enum Effect {
    Render(crux_core::render::RenderOperation),
    Http(crux_http::protocol::HttpRequest),
    Upload(UploadOperation),
}

pub type UploadCmd = crate::commands::upload::FirmwareUpload<Effect, Event>;
pub type HttpCmd = crux_http::command::Http<Effect, Event>;

/// The configuration page application.
#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = Model;
    type Effect = Effect;

    fn update(&self, event: Self::Event, model: &mut Self::Model) -> Command<Effect, Event> {
        update::update(event, model)
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        model.clone()
    }
}
