use serde::{Deserialize, Serialize};

/// Progress of a reboot request. `Done` tells the shell to schedule the page
/// reload whether or not the device answered, since a silent device is most
/// likely already restarting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RebootState {
    #[default]
    Idle,
    Requested,
    Done { success: bool },
}
