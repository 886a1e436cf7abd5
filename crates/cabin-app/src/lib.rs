//! cabin-app - Controller framework, screens, and state for Cabin Settings
//!
//! This crate implements the preference-controller lifecycle framework: the
//! controller contract and its typed binding, the per-screen registry that
//! drives lifecycle and restriction propagation, the top-level shell that
//! owns the back stack and the blocking overlay, and the TEA-style
//! message/update loop around it. The screens consuming the framework live
//! in `screens/`.

pub mod controller;
pub mod dialog;
pub mod handler;
pub mod message;
pub mod preference;
pub mod process;
pub mod registry;
pub mod screen;
pub mod screens;
pub mod shell;
pub mod state;

// Re-export primary types
pub use controller::{
    Binding, ClickOutcome, ControllerContext, Effect, PreferenceController, TaskKind, TaskRequest,
};
pub use dialog::{Dialog, DialogAction};
pub use handler::{UpdateAction, UpdateResult};
pub use message::{Message, TaskOutcome};
pub use preference::{Preference, PreferenceKey, PreferenceScreen, WidgetKind};
pub use process::process_message;
pub use registry::ControllerRegistry;
pub use screen::{RestrictionGate, ScreenDeclaration, ScreenId};
pub use shell::SettingsShell;
pub use state::{AppState, ShellPhase};

// Re-export domain types for the binary
pub use cabin_core::{AvailabilityStatus, PlatformEvent, RestrictionTier, UxRestrictions};
