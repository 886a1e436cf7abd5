//! Users screen: profile summary, add user, remove user.
//!
//! The whole screen requires the vehicle parked. Add-user additionally
//! demonstrates progressive disclosure: under elevated restriction the row
//! stays visible but is disabled, instead of the screen-level hide.

use cabin_core::prelude::*;
use cabin_core::{AvailabilityStatus, EventTopic, PlatformEvent, UxRestrictions};
use cabin_platform::{ListenerHandle, UserInfo};

use crate::controller::{Binding, ClickOutcome, ControllerContext, Effect, PreferenceController};
use crate::dialog::Dialog;
use crate::preference::{Preference, PreferenceScreen, WidgetKind};
use crate::screen::{RestrictionGate, ScreenDeclaration, ScreenId};

pub mod keys {
    use crate::preference::PreferenceKey;

    pub const CURRENT_USER: PreferenceKey = PreferenceKey::new("current_user");
    pub const ADD_USER: PreferenceKey = PreferenceKey::new("add_user");
    pub const REMOVE_USER: PreferenceKey = PreferenceKey::new("remove_user");
}

pub(crate) fn declaration() -> ScreenDeclaration {
    ScreenDeclaration {
        id: ScreenId::Users,
        gate: RestrictionGate::RequiresParked,
        listens_for_restrictions: true,
        build: build_preferences,
        controllers: vec![
            || Box::new(CurrentUserController::new()),
            || Box::new(AddUserController::new()),
            || Box::new(RemoveUserController::new()),
        ],
    }
}

fn build_preferences() -> Result<PreferenceScreen> {
    let mut screen = PreferenceScreen::new("users");
    screen.add(Preference::new(
        keys::CURRENT_USER,
        WidgetKind::Summary,
        "Signed in as",
    ))?;
    screen.add(
        Preference::new(keys::ADD_USER, WidgetKind::Action, "Add user").with_icon("plus"),
    )?;
    screen.add(Preference::new(
        keys::REMOVE_USER,
        WidgetKind::Action,
        "Remove user",
    ))?;
    Ok(screen)
}

/// Summary row for the active user.
pub struct CurrentUserController {
    binding: Binding,
}

impl CurrentUserController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::CURRENT_USER, WidgetKind::Summary),
        }
    }
}

impl PreferenceController for CurrentUserController {
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
        let user = ctx.platform.users.current_user();
        let summary = if user.admin {
            format!("{} (admin)", user.name)
        } else {
            user.name
        };
        preference.set_summary(summary);
    }
}

/// Creates a new profile. Visible but disabled while setup flows are
/// blocked by the current restrictions.
pub struct AddUserController {
    binding: Binding,
}

impl AddUserController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::ADD_USER, WidgetKind::Action),
        }
    }
}

impl PreferenceController for AddUserController {
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
        if ctx.restrictions.setup_allowed() {
            preference.set_summary("Create a new profile");
        } else {
            preference.set_enabled(false);
            preference.set_summary("Not available while driving");
        }
    }

    fn handle_click(
        &mut self,
        _preference: &mut Preference,
        ctx: &mut ControllerContext,
    ) -> ClickOutcome {
        match ctx.platform.users.add_user("New user") {
            Ok(user) => {
                info!(user = %user.id, "user created");
                ctx.push_effect(Effect::RefreshScreen);
            }
            Err(e) => warn!("could not create user: {e}"),
        }
        ClickOutcome::Handled
    }

    fn on_restrictions_changed(
        &mut self,
        restrictions: &UxRestrictions,
        preference: Option<&mut Preference>,
        _ctx: &mut ControllerContext,
    ) {
        // Disable eagerly; the refresh pass that follows confirms it.
        if let Some(pref) = preference {
            pref.set_enabled(restrictions.setup_allowed());
        }
    }
}

/// Removes the most recently added other user, behind a confirmation
/// dialog and a background task. Hidden unless the current user is an
/// admin with someone else to remove.
pub struct RemoveUserController {
    binding: Binding,
    subscription: Option<ListenerHandle>,
}

impl RemoveUserController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::REMOVE_USER, WidgetKind::Action),
            subscription: None,
        }
    }

    /// The user a removal would target: the most recently added account
    /// other than the active one.
    fn removal_candidate(ctx: &ControllerContext) -> Option<UserInfo> {
        let current = ctx.platform.users.current_user();
        ctx.platform
            .users
            .users()
            .into_iter()
            .filter(|u| u.id != current.id)
            .next_back()
    }
}

impl PreferenceController for RemoveUserController {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    fn availability(&self, ctx: &ControllerContext) -> AvailabilityStatus {
        if !ctx.platform.users.current_user_is_admin() {
            AvailabilityStatus::ConditionallyUnavailable
        } else if Self::removal_candidate(ctx).is_none() {
            AvailabilityStatus::ConditionallyUnavailable
        } else {
            AvailabilityStatus::Available
        }
    }

    fn on_start(&mut self, ctx: &mut ControllerContext) -> Result<()> {
        self.subscription = Some(ctx.listeners.subscribe(EventTopic::UsersChanged));
        Ok(())
    }

    fn on_stop(&mut self, _ctx: &mut ControllerContext) {
        self.subscription = None;
    }

    fn update_state(&mut self, preference: &mut Preference, ctx: &ControllerContext) {
        if let Some(candidate) = Self::removal_candidate(ctx) {
            preference.set_summary(format!("Remove {}", candidate.name));
        }
    }

    fn handle_click(
        &mut self,
        _preference: &mut Preference,
        ctx: &mut ControllerContext,
    ) -> ClickOutcome {
        if let Some(candidate) = Self::removal_candidate(ctx) {
            ctx.push_effect(Effect::ShowDialog(Dialog::confirm_remove_user(&candidate)));
        }
        ClickOutcome::Handled
    }

    fn on_event(&mut self, _event: &PlatformEvent, _ctx: &mut ControllerContext) {
        // The refresh pass after delivery re-queries the user list.
    }

    fn subscription(&self) -> Option<&ListenerHandle> {
        self.subscription.as_ref()
    }
}
