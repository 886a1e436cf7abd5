//! Application state (Model in TEA pattern)

use cabin_platform::{Platform, SettingsStore};

use crate::shell::SettingsShell;

/// Application lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellPhase {
    #[default]
    Running,
    Quitting,
}

/// Top-level application state: the shell plus the run phase.
pub struct AppState {
    pub shell: SettingsShell,
    pub phase: ShellPhase,
}

impl AppState {
    pub fn new(platform: Platform, store: Option<SettingsStore>) -> Self {
        Self {
            shell: SettingsShell::new(platform, store),
            phase: ShellPhase::Running,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == ShellPhase::Quitting
    }
}
