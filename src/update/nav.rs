//! Tab selection. Revealing a tab is never a local act, it is a request to
//! the device whose answer also refreshes the tab's values.

use crux_core::Command;

use crate::ajax_post;
use crate::events::Event;
use crate::model::Model;
use crate::protocol;
use crate::schema;
use crate::Effect;

pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Initialize => {
            log::info!("starting configuration session");
            select_tab(1, model)
        }
        Event::SelectTab { tab } => select_tab(tab, model),
        _ => unreachable!("Non-navigation event routed to navigation handler"),
    }
}

/// Request a tab's content. The tab only becomes active when the device
/// confirms, so a dead device leaves the page where it was.
fn select_tab(tab: usize, model: &mut Model) -> Command<Effect, Event> {
    if model.locked() {
        return Command::done();
    }
    if schema::tab(tab).is_none() {
        log::warn!("ignoring selection of unknown tab {tab}");
        return Command::done();
    }

    model.pending_tab = tab;
    ajax_post!(model, &protocol::selector_request(tab), Event::SyncResponse)
}
