//! Home screen: top-level entries into the feature areas.
//!
//! Entry controllers put live summaries on the rows (connection state,
//! current user, clock); navigation itself is fall-through, driven by each
//! entry's declared target screen.

use cabin_core::prelude::*;
use cabin_core::AvailabilityStatus;

use crate::controller::{Binding, ControllerContext, PreferenceController};
use crate::preference::{Preference, PreferenceScreen, WidgetKind};
use crate::screen::{RestrictionGate, ScreenDeclaration, ScreenId};

pub mod keys {
    use crate::preference::PreferenceKey;

    pub const WIFI: PreferenceKey = PreferenceKey::new("wifi_entry");
    pub const USERS: PreferenceKey = PreferenceKey::new("users_entry");
    pub const DATETIME: PreferenceKey = PreferenceKey::new("datetime_entry");
    pub const SYSTEM: PreferenceKey = PreferenceKey::new("system_entry");
}

/// The home screen predates restriction declarations; it is treated as
/// always showable and does not listen for changes.
pub(crate) fn declaration() -> ScreenDeclaration {
    ScreenDeclaration {
        id: ScreenId::Home,
        gate: RestrictionGate::Unaware,
        listens_for_restrictions: false,
        build: build_preferences,
        controllers: vec![
            || Box::new(WifiEntryController::new()),
            || Box::new(UsersEntryController::new()),
            || Box::new(DateTimeEntryController::new()),
            || Box::new(SystemEntryController::new()),
        ],
    }
}

fn build_preferences() -> Result<PreferenceScreen> {
    let mut screen = PreferenceScreen::new("home");
    screen.add(
        Preference::new(keys::WIFI, WidgetKind::Entry, "Wi-Fi")
            .with_icon("wifi")
            .with_target(ScreenId::Wifi),
    )?;
    screen.add(
        Preference::new(keys::USERS, WidgetKind::Entry, "Users")
            .with_icon("user")
            .with_target(ScreenId::Users),
    )?;
    screen.add(
        Preference::new(keys::DATETIME, WidgetKind::Entry, "Date & time")
            .with_icon("clock")
            .with_target(ScreenId::DateTime),
    )?;
    screen.add(
        Preference::new(keys::SYSTEM, WidgetKind::Entry, "System")
            .with_icon("gear")
            .with_target(ScreenId::System),
    )?;
    Ok(screen)
}

/// Summarizes connection state on the Wi-Fi entry; hidden entirely on
/// builds without wifi hardware.
pub struct WifiEntryController {
    binding: Binding,
}

impl WifiEntryController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::WIFI, WidgetKind::Entry),
        }
    }
}

impl PreferenceController for WifiEntryController {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    fn availability(&self, ctx: &ControllerContext) -> AvailabilityStatus {
        if ctx.platform.wifi.is_present() {
            AvailabilityStatus::Available
        } else {
            AvailabilityStatus::UnsupportedOnDevice
        }
    }

    fn update_state(&mut self, preference: &mut Preference, ctx: &ControllerContext) {
        let summary = match ctx.platform.wifi.connected_network() {
            Some(network) => format!("Connected to {}", network.ssid),
            None if ctx.platform.wifi.is_enabled() => "Not connected".to_string(),
            None => "Off".to_string(),
        };
        preference.set_summary(summary);
    }
}

/// Shows the active user on the Users entry.
pub struct UsersEntryController {
    binding: Binding,
}

impl UsersEntryController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::USERS, WidgetKind::Entry),
        }
    }
}

impl PreferenceController for UsersEntryController {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    fn availability(&self, _ctx: &ControllerContext) -> AvailabilityStatus {
        AvailabilityStatus::Available
    }

    fn update_state(&mut self, preference: &mut Preference, ctx: &ControllerContext) {
        preference.set_summary(ctx.platform.users.current_user().name);
    }
}

/// Shows the current date and time on the Date & time entry.
pub struct DateTimeEntryController {
    binding: Binding,
}

impl DateTimeEntryController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::DATETIME, WidgetKind::Entry),
        }
    }
}

impl PreferenceController for DateTimeEntryController {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    fn availability(&self, _ctx: &ControllerContext) -> AvailabilityStatus {
        AvailabilityStatus::Available
    }

    fn update_state(&mut self, preference: &mut Preference, ctx: &ControllerContext) {
        let clock = &ctx.platform.clock;
        preference.set_summary(format!("{} {}", clock.current_date(), clock.current_time()));
    }
}

/// Shows the build on the System entry.
pub struct SystemEntryController {
    binding: Binding,
}

impl SystemEntryController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::SYSTEM, WidgetKind::Entry),
        }
    }
}

impl PreferenceController for SystemEntryController {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    fn availability(&self, _ctx: &ControllerContext) -> AvailabilityStatus {
        AvailabilityStatus::Available
    }

    fn update_state(&mut self, preference: &mut Preference, ctx: &ControllerContext) {
        preference.set_summary(ctx.platform.device.build_display());
    }
}
