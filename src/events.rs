use serde::{Deserialize, Serialize};

use crate::protocol::DeviceReply;
use crate::types::ControlValue;

/// Everything that can happen to the core. Shell-sent variants come from user
/// interaction or from timers the shell runs off the published cadences; the
/// `#[serde(skip)]` variants are produced internally when effects resolve.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Event {
    /// Sent once the page scaffold is up; selects the status tab.
    Initialize,

    // Navigation
    SelectTab { tab: usize },

    // Form actions
    /// User changed a control; the new content replaces the stored value.
    FieldEdited { name: String, value: ControlValue },
    Save,
    /// Timer event reverting the transient save message.
    ClearSaveMessage,

    // Device control
    Reboot,

    // Firmware update
    StartFirmwareUpdate { file_name: String },
    /// Timer tick while the session waits for the device updater.
    UpdatePollTick,
    /// Transfer progress callback from the shell, in percent.
    UploadProgress(u8),

    // Effect responses
    #[serde(skip)]
    SyncResponse(DeviceReply),
    #[serde(skip)]
    RebootResponse(DeviceReply),
    #[serde(skip)]
    PrepareResponse(DeviceReply),
    #[serde(skip)]
    PollResponse(DeviceReply),
    #[serde(skip)]
    UploadResponse(DeviceReply),
}
