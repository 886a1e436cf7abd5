//! Date & time screen: automatic time plus manual date/time rows.
//!
//! The manual rows stay visible while automatic time is on but are
//! disabled, mirroring how the pickers behave in the vehicle UI.

use cabin_core::prelude::*;
use cabin_core::{AvailabilityStatus, EventTopic};
use cabin_platform::ListenerHandle;

use crate::controller::{Binding, ClickOutcome, ControllerContext, Effect, PreferenceController};
use crate::preference::{Preference, PreferenceScreen, WidgetKind};
use crate::screen::{RestrictionGate, ScreenDeclaration, ScreenId};

pub mod keys {
    use crate::preference::PreferenceKey;

    pub const AUTO_TIME: PreferenceKey = PreferenceKey::new("auto_time");
    pub const SET_DATE: PreferenceKey = PreferenceKey::new("set_date");
    pub const SET_TIME: PreferenceKey = PreferenceKey::new("set_time");
}

pub(crate) fn declaration() -> ScreenDeclaration {
    ScreenDeclaration {
        id: ScreenId::DateTime,
        gate: RestrictionGate::DistractionOptimized,
        listens_for_restrictions: true,
        build: build_preferences,
        controllers: vec![
            || Box::new(AutoTimeController::new()),
            || Box::new(SetDateController::new()),
            || Box::new(SetTimeController::new()),
        ],
    }
}

fn build_preferences() -> Result<PreferenceScreen> {
    let mut screen = PreferenceScreen::new("datetime");
    screen.add(Preference::new(
        keys::AUTO_TIME,
        WidgetKind::Toggle,
        "Automatic date & time",
    ))?;
    screen.add(Preference::new(
        keys::SET_DATE,
        WidgetKind::Action,
        "Set date",
    ))?;
    screen.add(Preference::new(
        keys::SET_TIME,
        WidgetKind::Action,
        "Set time",
    ))?;
    Ok(screen)
}

/// Network-time toggle; follows external time-configuration broadcasts.
pub struct AutoTimeController {
    binding: Binding,
    subscription: Option<ListenerHandle>,
}

impl AutoTimeController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::AUTO_TIME, WidgetKind::Toggle),
            subscription: None,
        }
    }
}

impl PreferenceController for AutoTimeController {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    fn availability(&self, _ctx: &ControllerContext) -> AvailabilityStatus {
        AvailabilityStatus::Available
    }

    fn on_start(&mut self, ctx: &mut ControllerContext) -> Result<()> {
        self.subscription = Some(ctx.listeners.subscribe(EventTopic::TimeChanged));
        Ok(())
    }

    fn on_stop(&mut self, _ctx: &mut ControllerContext) {
        self.subscription = None;
    }

    fn update_state(&mut self, preference: &mut Preference, ctx: &ControllerContext) {
        preference.set_checked(ctx.platform.clock.auto_time_enabled());
        preference.set_summary("Use network-provided time");
    }

    fn handle_click(
        &mut self,
        preference: &mut Preference,
        ctx: &mut ControllerContext,
    ) -> ClickOutcome {
        let target = !ctx.platform.clock.auto_time_enabled();
        match ctx.platform.clock.set_auto_time(target) {
            Ok(()) => {
                preference.set_checked(target);
                ctx.push_effect(Effect::PersistSettings);
                ctx.push_effect(Effect::RefreshScreen);
            }
            Err(e) => warn!("could not change auto time: {e}"),
        }
        ClickOutcome::Handled
    }

    fn subscription(&self) -> Option<&ListenerHandle> {
        self.subscription.as_ref()
    }
}

/// Manual date row: summary carries the current date, disabled while
/// automatic time is on.
pub struct SetDateController {
    binding: Binding,
}

impl SetDateController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::SET_DATE, WidgetKind::Action),
        }
    }
}

impl PreferenceController for SetDateController {
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
        preference.set_summary(ctx.platform.clock.current_date());
        if ctx.platform.clock.auto_time_enabled() {
            preference.set_enabled(false);
        }
    }

    fn handle_click(
        &mut self,
        _preference: &mut Preference,
        _ctx: &mut ControllerContext,
    ) -> ClickOutcome {
        info!("opening date picker");
        ClickOutcome::Handled
    }
}

/// Manual time row, same gating as the date row.
pub struct SetTimeController {
    binding: Binding,
}

impl SetTimeController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::SET_TIME, WidgetKind::Action),
        }
    }
}

impl PreferenceController for SetTimeController {
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
        preference.set_summary(ctx.platform.clock.current_time());
        if ctx.platform.clock.auto_time_enabled() {
            preference.set_enabled(false);
        }
    }

    fn handle_click(
        &mut self,
        _preference: &mut Preference,
        _ctx: &mut ControllerContext,
    ) -> ClickOutcome {
        info!("opening time picker");
        ClickOutcome::Handled
    }
}
