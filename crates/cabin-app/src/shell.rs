//! Top-level screen host.
//!
//! The shell owns the process-wide restriction snapshot, the screen back
//! stack, and the dialog stack. It subscribes once to the restriction
//! channel (via the message loop), fans changes out to the active screen
//! only, and evaluates the screen-level blocking overlay on every
//! restriction change and every back-stack change.

use std::collections::VecDeque;

use cabin_core::prelude::*;
use cabin_core::{PlatformEvent, UxRestrictions};
use cabin_platform::{ListenerHub, PersistedSettings, Platform, SettingsStore};

use crate::controller::{ClickOutcome, ControllerContext, Effect, TaskRequest};
use crate::dialog::{Dialog, DialogAction, TAG_REMOVE_USER_ERROR};
use crate::message::TaskOutcome;
use crate::preference::PreferenceScreen;
use crate::registry::ControllerRegistry;
use crate::screen::{ScreenDeclaration, ScreenId};
use crate::screens;

/// Message shown when an interaction is blocked by driving restrictions.
pub const BLOCKED_WHILE_DRIVING: &str = "This feature is not available while driving";

/// One live screen on the back stack.
struct ScreenInstance {
    declaration: ScreenDeclaration,
    screen: PreferenceScreen,
    registry: ControllerRegistry,
    /// Monotonic activation tag; background-task completions carrying a
    /// different generation are dropped.
    generation: u64,
    /// The restriction-listener capability, queried once at activation.
    listens: bool,
}

/// Top-level host: back stack, restriction fan-out, dialogs, overlay.
pub struct SettingsShell {
    platform: Platform,
    listeners: ListenerHub,
    store: Option<SettingsStore>,
    restrictions: UxRestrictions,
    stack: Vec<ScreenInstance>,
    dialogs: Vec<Dialog>,
    overlay_visible: bool,
    last_blocking_message: Option<String>,
    generation_counter: u64,
    pending_tasks: VecDeque<TaskRequest>,
}

impl SettingsShell {
    pub fn new(platform: Platform, store: Option<SettingsStore>) -> Self {
        Self {
            platform,
            listeners: ListenerHub::new(),
            store,
            restrictions: UxRestrictions::default(),
            stack: Vec::new(),
            dialogs: Vec::new(),
            overlay_visible: false,
            last_blocking_message: None,
            generation_counter: 0,
            pending_tasks: VecDeque::new(),
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn restrictions(&self) -> &UxRestrictions {
        &self.restrictions
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn active_screen_id(&self) -> Option<ScreenId> {
        self.stack.last().map(|i| i.declaration.id)
    }

    /// The active screen's element tree, for rendering.
    pub fn active_screen(&self) -> Option<&PreferenceScreen> {
        self.stack.last().map(|i| &i.screen)
    }

    pub fn back_stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Listener registrations live across the whole shell; exposed for
    /// leak assertions.
    pub fn listener_hub(&self) -> &ListenerHub {
        &self.listeners
    }

    pub fn top_dialog(&self) -> Option<&Dialog> {
        self.dialogs.last()
    }

    /// Find a showing dialog by tag (used to reattach to dialogs that
    /// survived a refresh).
    pub fn find_dialog_by_tag(&self, tag: &str) -> Option<&Dialog> {
        self.dialogs.iter().find(|d| d.tag == tag)
    }

    /// Take the last blocking-message toast, if one was raised.
    pub fn take_blocking_message(&mut self) -> Option<String> {
        self.last_blocking_message.take()
    }

    /// Take the next background-task request queued by a controller.
    pub fn take_pending_task(&mut self) -> Option<TaskRequest> {
        self.pending_tasks.pop_front()
    }

    fn ctx(&self) -> ControllerContext {
        ControllerContext::new(
            self.platform.clone(),
            self.restrictions,
            self.listeners.clone(),
        )
    }

    /// Open a screen on top of the stack.
    ///
    /// The current screen is stopped (it keeps its state for the return
    /// trip); the new screen is built, created and started. Construction
    /// failures are fatal: the screen does not initialize and the error
    /// propagates.
    pub fn launch_screen(&mut self, id: ScreenId) -> Result<()> {
        info!(screen = %id, "launching screen");

        let mut ctx = self.ctx();
        if let Some(top) = self.stack.last_mut() {
            top.registry.stop(&mut ctx);
        }

        let declaration = screens::declaration(id);
        let mut screen = (declaration.build)()?;
        let controllers = declaration.instantiate_controllers();
        let mut registry = ControllerRegistry::create(&screen, controllers, &mut ctx)?;
        registry.start(&mut screen, &mut ctx)?;

        self.generation_counter += 1;
        self.stack.push(ScreenInstance {
            listens: declaration.listens_for_restrictions,
            declaration,
            screen,
            registry,
            generation: self.generation_counter,
        });

        self.drain_effects(ctx)?;
        self.update_blocking_overlay();
        Ok(())
    }

    /// Pop the top screen: symmetric teardown (stop + destroy), then the
    /// revealed screen restarts and the overlay is re-evaluated for it.
    pub fn go_back(&mut self) -> Result<()> {
        if self.stack.len() <= 1 {
            debug!("back stack at root, ignoring");
            return Ok(());
        }

        let mut ctx = self.ctx();
        if let Some(mut top) = self.stack.pop() {
            top.registry.stop(&mut ctx);
            top.registry.destroy(&mut ctx);
            info!(screen = %top.declaration.id, "screen destroyed");
        }
        if let Some(top) = self.stack.last_mut() {
            top.registry.start(&mut top.screen, &mut ctx)?;
        }

        self.drain_effects(ctx)?;
        self.update_blocking_overlay();
        Ok(())
    }

    /// A new restriction snapshot arrived on the process-wide channel.
    ///
    /// Stale (non-monotonic) updates are dropped. The change is forwarded
    /// to the active screen only, and only when that screen declared the
    /// restriction-listener capability; the blocking overlay is
    /// re-evaluated either way.
    pub fn handle_restrictions_changed(&mut self, incoming: UxRestrictions) -> Result<()> {
        if self.restrictions.is_stale_update(&incoming) {
            warn!(
                current = self.restrictions.timestamp_ms,
                incoming = incoming.timestamp_ms,
                "stale restriction update dropped"
            );
            return Ok(());
        }
        self.restrictions = incoming;

        let mut pending_ctx = None;
        if let Some(top) = self.stack.last_mut() {
            if top.listens {
                let mut ctx = ControllerContext::new(
                    self.platform.clone(),
                    incoming,
                    self.listeners.clone(),
                );
                top.registry
                    .notify_restrictions_changed(&incoming, &mut top.screen, &mut ctx)?;
                pending_ctx = Some(ctx);
            }
        }
        if let Some(ctx) = pending_ctx {
            self.drain_effects(ctx)?;
        }

        self.update_blocking_overlay();
        Ok(())
    }

    /// Route a click on the active screen.
    ///
    /// Blocked entirely while the blocking overlay is up. An unhandled
    /// click falls through to the element's target-screen navigation.
    pub fn handle_click(&mut self, name: &str) -> Result<()> {
        if self.overlay_visible {
            self.show_blocking_message();
            return Ok(());
        }
        if self.top_dialog().is_some() {
            debug!("click ignored while a dialog is showing");
            return Ok(());
        }

        let mut fall_through = None;
        let mut pending_ctx = None;
        if let Some(top) = self.stack.last_mut() {
            let Some(key) = top.screen.find_key(name) else {
                debug!(name, "click on unknown preference ignored");
                return Ok(());
            };
            let Some(pref) = top.screen.get(key) else {
                return Ok(());
            };
            if !pref.is_visible() || !pref.is_enabled() {
                debug!(key = %key, "click on inert preference ignored");
                return Ok(());
            }
            let target = pref.target_screen();

            let mut ctx = ControllerContext::new(
                self.platform.clone(),
                self.restrictions,
                self.listeners.clone(),
            );
            let outcome = top.registry.dispatch_click(key, &mut top.screen, &mut ctx);
            if outcome == ClickOutcome::NotHandled {
                fall_through = target;
            }
            pending_ctx = Some(ctx);
        }
        if let Some(ctx) = pending_ctx {
            self.drain_effects(ctx)?;
        }
        if let Some(target) = fall_through {
            self.launch_screen(target)?;
        }
        Ok(())
    }

    /// Deliver a platform broadcast to the active screen only; inactive
    /// screens catch up when they restart.
    pub fn handle_platform_event(&mut self, event: PlatformEvent) -> Result<()> {
        let mut pending_ctx = None;
        if let Some(top) = self.stack.last_mut() {
            let mut ctx = ControllerContext::new(
                self.platform.clone(),
                self.restrictions,
                self.listeners.clone(),
            );
            top.registry
                .deliver_event(&event, &mut top.screen, &mut ctx)?;
            pending_ctx = Some(ctx);
        }
        if let Some(ctx) = pending_ctx {
            self.drain_effects(ctx)?;
        }
        Ok(())
    }

    /// A background task completed. Completions whose generation does not
    /// match the active screen arrived after teardown (or after
    /// navigation) and are silently dropped.
    pub fn handle_task_outcome(&mut self, outcome: TaskOutcome) -> Result<()> {
        let active_generation = self.stack.last().map(|i| i.generation);
        if active_generation != Some(outcome.generation()) {
            debug!(?outcome, "task completion for inactive screen dropped");
            return Ok(());
        }

        match outcome {
            TaskOutcome::UserRemoved { user, result, .. } => match result {
                Ok(()) => {
                    info!(%user, "user removed");
                    self.dismiss_dialog_by_tag(TAG_REMOVE_USER_ERROR);
                    self.refresh_active_screen()?;
                }
                Err(reason) => {
                    warn!(%user, reason, "user removal failed");
                    self.show_dialog(Dialog::remove_user_error(user, &reason));
                }
            },
        }
        Ok(())
    }

    /// The user picked a dialog choice (top dialog, by index).
    pub fn handle_dialog_choice(&mut self, choice_index: usize) -> Result<()> {
        let Some(dialog) = self.dialogs.pop() else {
            debug!("dialog choice with no dialog showing");
            return Ok(());
        };
        let Some(choice) = dialog.choices.get(choice_index) else {
            warn!(tag = dialog.tag, choice_index, "dialog choice out of range");
            self.dialogs.push(dialog);
            return Ok(());
        };

        match choice.action {
            DialogAction::Dismiss => {}
            DialogAction::RemoveUser { user } => {
                if let Some(generation) = self.stack.last().map(|i| i.generation) {
                    self.pending_tasks.push_back(TaskRequest {
                        kind: crate::controller::TaskKind::RemoveUser { user },
                        generation,
                    });
                }
            }
            DialogAction::ResetNetwork => {
                self.platform.wifi.disconnect();
                info!("network settings reset");
                self.refresh_active_screen()?;
            }
        }
        Ok(())
    }

    /// Re-run the active screen's display/update pass (explicit refresh
    /// request).
    pub fn refresh_active_screen(&mut self) -> Result<()> {
        let ctx = self.ctx();
        if let Some(top) = self.stack.last_mut() {
            top.registry.refresh(&mut top.screen, &ctx)?;
        }
        Ok(())
    }

    pub fn show_dialog(&mut self, dialog: Dialog) {
        // Same tag replaces the showing instance, preserving position.
        self.dialogs.retain(|d| d.tag != dialog.tag);
        info!(tag = dialog.tag, "showing dialog");
        self.dialogs.push(dialog);
    }

    pub fn dismiss_dialog_by_tag(&mut self, tag: &str) {
        self.dialogs.retain(|d| d.tag != tag);
    }

    fn show_blocking_message(&mut self) {
        info!("interaction blocked by driving restrictions");
        self.last_blocking_message = Some(BLOCKED_WHILE_DRIVING.to_string());
    }

    /// Overlay shown iff the active screen's declared gate rejects the
    /// current restrictions. Screens that declared nothing never block.
    fn update_blocking_overlay(&mut self) {
        let show = self
            .stack
            .last()
            .map(|top| !top.declaration.can_be_shown(&self.restrictions))
            .unwrap_or(false);
        if show != self.overlay_visible {
            info!(show, "blocking overlay changed");
        }
        self.overlay_visible = show;
    }

    /// Execute the side effects a dispatch queued, in order.
    fn drain_effects(&mut self, mut ctx: ControllerContext) -> Result<()> {
        for effect in ctx.take_effects() {
            match effect {
                Effect::LaunchScreen(id) => self.launch_screen(id)?,
                Effect::GoBack => self.go_back()?,
                Effect::ShowDialog(dialog) => self.show_dialog(dialog),
                Effect::DismissDialog { tag } => self.dismiss_dialog_by_tag(tag),
                Effect::ShowBlockingMessage => self.show_blocking_message(),
                Effect::SpawnTask(kind) => {
                    if let Some(generation) = self.stack.last().map(|i| i.generation) {
                        self.pending_tasks.push_back(TaskRequest { kind, generation });
                    }
                }
                Effect::RefreshScreen => self.refresh_active_screen()?,
                Effect::PersistSettings => self.persist_settings(),
            }
        }
        Ok(())
    }

    /// Write the persistable values through the store. Failures are
    /// logged, not surfaced: persistence is best-effort.
    fn persist_settings(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let settings = PersistedSettings {
            wifi_enabled: self.platform.wifi.is_enabled(),
            auto_time: self.platform.clock.auto_time_enabled(),
        };
        if let Err(e) = store.save(&settings) {
            warn!("failed to persist settings: {e}");
        }
    }
}
