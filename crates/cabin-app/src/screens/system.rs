//! System screen: build identification, updates, network reset.

use cabin_core::prelude::*;
use cabin_core::AvailabilityStatus;

use crate::controller::{Binding, ClickOutcome, ControllerContext, Effect, PreferenceController};
use crate::dialog::Dialog;
use crate::preference::{Preference, PreferenceScreen, WidgetKind};
use crate::screen::{RestrictionGate, ScreenDeclaration, ScreenId};

pub mod keys {
    use crate::preference::PreferenceKey;

    pub const BUILD_NUMBER: PreferenceKey = PreferenceKey::new("build_number");
    pub const SYSTEM_UPDATE: PreferenceKey = PreferenceKey::new("system_update");
    pub const RESET_NETWORK: PreferenceKey = PreferenceKey::new("reset_network");
}

pub(crate) fn declaration() -> ScreenDeclaration {
    ScreenDeclaration {
        id: ScreenId::System,
        gate: RestrictionGate::DistractionOptimized,
        listens_for_restrictions: true,
        build: build_preferences,
        controllers: vec![
            || Box::new(SystemUpdateController::new()),
            || Box::new(ResetNetworkController::new()),
            || Box::new(BuildNumberController::new()),
        ],
    }
}

fn build_preferences() -> Result<PreferenceScreen> {
    let mut screen = PreferenceScreen::new("system");
    screen.add(Preference::new(
        keys::SYSTEM_UPDATE,
        WidgetKind::Action,
        "System update",
    ))?;
    screen.add(Preference::new(
        keys::RESET_NETWORK,
        WidgetKind::Action,
        "Reset network settings",
    ))?;
    screen.add(Preference::new(
        keys::BUILD_NUMBER,
        WidgetKind::Summary,
        "Build number",
    ))?;
    Ok(screen)
}

/// Puts the build identifier on its summary row.
pub struct BuildNumberController {
    binding: Binding,
}

impl BuildNumberController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::BUILD_NUMBER, WidgetKind::Summary),
        }
    }
}

impl PreferenceController for BuildNumberController {
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

/// System update entry: absent on builds without the flow, inert for
/// non-admin users.
pub struct SystemUpdateController {
    binding: Binding,
}

impl SystemUpdateController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::SYSTEM_UPDATE, WidgetKind::Action),
        }
    }
}

impl PreferenceController for SystemUpdateController {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    fn availability(&self, ctx: &ControllerContext) -> AvailabilityStatus {
        // An unavailable update manager degrades to "unsupported" instead
        // of propagating.
        let supported = ctx
            .platform
            .device
            .supports_system_update()
            .unwrap_or_else(|e| {
                warn!("system update support query failed: {e}");
                false
            });
        if !supported {
            AvailabilityStatus::UnsupportedOnDevice
        } else if !ctx.platform.users.current_user_is_admin() {
            AvailabilityStatus::DisabledForUser
        } else {
            AvailabilityStatus::Available
        }
    }

    fn update_state(&mut self, preference: &mut Preference, _ctx: &ControllerContext) {
        preference.set_summary("Up to date");
    }

    fn handle_click(
        &mut self,
        _preference: &mut Preference,
        _ctx: &mut ControllerContext,
    ) -> ClickOutcome {
        info!("launching system update flow");
        ClickOutcome::Handled
    }
}

/// Network reset entry: confirmation dialog first, admin-gated.
pub struct ResetNetworkController {
    binding: Binding,
}

impl ResetNetworkController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::RESET_NETWORK, WidgetKind::Action),
        }
    }
}

impl PreferenceController for ResetNetworkController {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    fn availability(&self, ctx: &ControllerContext) -> AvailabilityStatus {
        if ctx.platform.users.current_user_is_admin() {
            AvailabilityStatus::Available
        } else {
            AvailabilityStatus::DisabledForUser
        }
    }

    fn update_state(&mut self, preference: &mut Preference, ctx: &ControllerContext) {
        if !ctx.platform.users.current_user_is_admin() {
            preference.set_summary("Only the admin user can reset network settings");
        } else {
            preference.clear_summary();
        }
    }

    fn handle_click(
        &mut self,
        _preference: &mut Preference,
        ctx: &mut ControllerContext,
    ) -> ClickOutcome {
        ctx.push_effect(Effect::ShowDialog(Dialog::confirm_reset_network()));
        ClickOutcome::Handled
    }
}
