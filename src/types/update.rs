use serde::{Deserialize, Serialize};

/// Phases of a firmware update session.
///
/// The session is driven by three inputs: device replies, shell timer ticks
/// while in `WaitingForDevice`, and the final upload outcome. Terminal states
/// stay in the model until the page reloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UpdateSession {
    #[default]
    Idle,
    /// The request switching the device into update mode is in flight.
    Preparing,
    /// The device restarts into its updater; probes run until one succeeds.
    WaitingForDevice { attempt: u32, probing: bool },
    /// The image transfer is running.
    Uploading { progress: u8 },
    /// The device confirmed the image; a reload is due.
    Completed { message: String },
    Failed { reason: String },
}

impl UpdateSession {
    /// A new session may only begin from rest or after a failure.
    pub fn can_start(&self) -> bool {
        matches!(self, UpdateSession::Idle | UpdateSession::Failed { .. })
    }
}

/// Cadences and delays the shell schedules on behalf of the core. The core
/// only publishes them; all clocks live in the shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timings {
    /// How long a transient save message stays up.
    pub message_display_ms: u32,
    /// Interval between update readiness probes.
    pub update_poll_ms: u32,
    /// Delay before reloading once an update completed.
    pub reload_after_update_ms: u32,
    /// Delay before reloading after a reboot request was answered.
    pub reload_after_reboot_ms: u32,
    /// Probe ceiling; `None` keeps probing until the page goes away.
    pub max_update_polls: Option<u32>,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            message_display_ms: 5_000,
            update_poll_ms: 1_000,
            reload_after_update_ms: 15_000,
            reload_after_reboot_ms: 5_000,
            max_update_polls: None,
        }
    }
}
