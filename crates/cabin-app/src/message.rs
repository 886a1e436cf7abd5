//! Message types for the application (TEA pattern)

use cabin_core::{PlatformEvent, UxRestrictions};
use cabin_platform::UserId;

use crate::screen::ScreenId;

/// Completion of a background task, delivered back into the single
/// dispatch thread as a discrete event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    UserRemoved {
        user: UserId,
        /// Generation of the screen that requested the task; mismatches
        /// are dropped by the shell (teardown liveness check).
        generation: u64,
        result: std::result::Result<(), String>,
    },
}

impl TaskOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            TaskOutcome::UserRemoved { generation, .. } => *generation,
        }
    }
}

/// All possible messages/actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Click on the active screen's preference, by key name.
    Click { key: String },

    /// Pop the top screen off the back stack.
    Back,

    /// Push a screen onto the back stack.
    OpenScreen(ScreenId),

    /// Choose an option (by index) of the top dialog.
    DialogChoice { index: usize },

    /// New snapshot from the restriction broadcast channel.
    RestrictionsChanged(UxRestrictions),

    /// External state-change broadcast.
    Platform(PlatformEvent),

    /// Background task completed.
    TaskCompleted(TaskOutcome),

    /// Request to quit.
    Quit,
}
