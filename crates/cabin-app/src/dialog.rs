//! Modal dialogs raised by controllers and the shell.

use cabin_platform::{UserId, UserInfo};

pub const TAG_CONFIRM_REMOVE_USER: &str = "confirm_remove_user";
pub const TAG_REMOVE_USER_ERROR: &str = "remove_user_error";
pub const TAG_CONFIRM_RESET_NETWORK: &str = "confirm_reset_network";

/// What choosing a dialog option does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    /// Kick off the background removal task.
    RemoveUser { user: UserId },
    /// Drop the current network association.
    ResetNetwork,
    /// Close the dialog with no further action.
    Dismiss,
}

/// One selectable dialog option.
#[derive(Debug, Clone)]
pub struct DialogChoice {
    pub label: String,
    pub action: DialogAction,
}

/// A modal dialog, addressed by tag so listeners can be reattached to a
/// dialog that is already showing.
#[derive(Debug, Clone)]
pub struct Dialog {
    pub tag: &'static str,
    pub title: String,
    pub message: String,
    pub choices: Vec<DialogChoice>,
}

impl Dialog {
    fn new(tag: &'static str, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tag,
            title: title.into(),
            message: message.into(),
            choices: Vec::new(),
        }
    }

    fn choice(mut self, label: impl Into<String>, action: DialogAction) -> Self {
        self.choices.push(DialogChoice {
            label: label.into(),
            action,
        });
        self
    }

    /// Confirmation shown before removing a user.
    pub fn confirm_remove_user(user: &UserInfo) -> Self {
        Self::new(
            TAG_CONFIRM_REMOVE_USER,
            "Remove user?",
            format!(
                "Remove {}? Their apps and data will be deleted.",
                user.name
            ),
        )
        .choice("Remove", DialogAction::RemoveUser { user: user.id })
        .choice("Cancel", DialogAction::Dismiss)
    }

    /// Error dialog with a retry affordance, shown when removal failed.
    pub fn remove_user_error(user: UserId, reason: &str) -> Self {
        Self::new(
            TAG_REMOVE_USER_ERROR,
            "Could not remove user",
            reason.to_string(),
        )
        .choice("Retry", DialogAction::RemoveUser { user })
        .choice("Cancel", DialogAction::Dismiss)
    }

    /// Confirmation shown before resetting network settings.
    pub fn confirm_reset_network() -> Self {
        Self::new(
            TAG_CONFIRM_RESET_NETWORK,
            "Reset network settings?",
            "This drops the current Wi-Fi connection.",
        )
        .choice("Reset", DialogAction::ResetNetwork)
        .choice("Cancel", DialogAction::Dismiss)
    }
}
