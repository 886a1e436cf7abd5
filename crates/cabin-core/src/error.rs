//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Screen Declaration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Duplicate preference key '{key}' on screen '{screen}'")]
    DuplicateKey { key: String, screen: String },

    #[error("Controller references unknown preference key '{key}' on screen '{screen}'")]
    UnknownKey { key: String, screen: String },

    #[error("Preference '{key}' is a {found} widget, controller expects {expected}")]
    WidgetMismatch {
        key: String,
        expected: String,
        found: String,
    },

    #[error("Screen '{screen}' failed to initialize: {message}")]
    ScreenInit { screen: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Platform Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Platform query failed: {message}")]
    Platform { message: String },

    #[error("Could not remove user: {message}")]
    UserRemoval { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn duplicate_key(key: impl Into<String>, screen: impl Into<String>) -> Self {
        Self::DuplicateKey {
            key: key.into(),
            screen: screen.into(),
        }
    }

    pub fn unknown_key(key: impl Into<String>, screen: impl Into<String>) -> Self {
        Self::UnknownKey {
            key: key.into(),
            screen: screen.into(),
        }
    }

    pub fn widget_mismatch(
        key: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::WidgetMismatch {
            key: key.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn screen_init(screen: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ScreenInit {
            screen: screen.into(),
            message: message.into(),
        }
    }

    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }

    pub fn user_removal(message: impl Into<String>) -> Self {
        Self::UserRemoval {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error.
    ///
    /// Recoverable errors degrade into an availability status or a
    /// user-visible dialog; they never abort the shell.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Platform { .. } | Error::UserRemoval { .. } | Error::ChannelSend { .. }
        )
    }

    /// Check if this error is a programming/configuration error that must
    /// fail screen construction rather than be masked.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::DuplicateKey { .. }
                | Error::UnknownKey { .. }
                | Error::WidgetMismatch { .. }
                | Error::ScreenInit { .. }
                | Error::ConfigNotFound { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::duplicate_key("wifi_toggle", "wifi");
        assert_eq!(
            err.to_string(),
            "Duplicate preference key 'wifi_toggle' on screen 'wifi'"
        );

        let err = Error::widget_mismatch("auto_time", "Toggle", "Action");
        assert!(err.to_string().contains("expects Toggle"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::duplicate_key("k", "s").is_fatal());
        assert!(Error::unknown_key("k", "s").is_fatal());
        assert!(Error::widget_mismatch("k", "Toggle", "Action").is_fatal());
        assert!(!Error::platform("query failed").is_fatal());
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::platform("feature manager unavailable").is_recoverable());
        assert!(Error::user_removal("user is logged in").is_recoverable());
        assert!(!Error::duplicate_key("k", "s").is_recoverable());
    }

    #[test]
    fn test_error_constructors() {
        let _ = Error::screen_init("users", "factory panicked");
        let _ = Error::config("bad toml");
        let _ = Error::channel_send("loop gone");
    }
}
