//! Controller registry: owns the controllers of one screen instance and
//! drives their lifecycle in lockstep with the screen's.

use std::collections::HashSet;

use cabin_core::prelude::*;
use cabin_core::{PlatformEvent, UxRestrictions};

use crate::controller::{ClickOutcome, ControllerContext, PreferenceController};
use crate::preference::{PreferenceKey, PreferenceScreen};

/// Ordered set of controllers for one screen instance.
///
/// Construction order equals declaration order; every forward pass
/// (create, start, refresh, restriction propagation) runs in that order and
/// every teardown pass (stop, destroy) runs in reverse.
pub struct ControllerRegistry {
    screen_name: &'static str,
    controllers: Vec<Box<dyn PreferenceController>>,
    /// Last restriction snapshot delivered to the controllers, used to
    /// suppress duplicate broadcasts.
    last_restrictions: Option<UxRestrictions>,
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("screen_name", &self.screen_name)
            .field("controllers", &self.controllers.len())
            .field("last_restrictions", &self.last_restrictions)
            .finish()
    }
}

impl ControllerRegistry {
    /// Validate the declared controllers and run `on_create` on each, in
    /// declaration order.
    ///
    /// Duplicate controller keys and keys absent from the declared tree are
    /// fatal configuration errors; a failing `on_create` aborts screen
    /// initialization. Neither is masked.
    pub fn create(
        screen: &PreferenceScreen,
        mut controllers: Vec<Box<dyn PreferenceController>>,
        ctx: &mut ControllerContext,
    ) -> Result<Self> {
        let mut seen: HashSet<PreferenceKey> = HashSet::new();

        for controller in &controllers {
            let key = controller.key();
            if !seen.insert(key) {
                return Err(Error::duplicate_key(key.as_str(), screen.name()));
            }
            if !screen.contains(key) {
                return Err(Error::unknown_key(key.as_str(), screen.name()));
            }
        }

        for controller in &mut controllers {
            controller.on_create(ctx)?;
        }

        debug!(
            screen = screen.name(),
            count = controllers.len(),
            "controllers created"
        );
        Ok(Self {
            screen_name: screen.name(),
            controllers,
            last_restrictions: None,
        })
    }

    /// Run `on_start` on every controller, then the display/update pass.
    pub fn start(
        &mut self,
        screen: &mut PreferenceScreen,
        ctx: &mut ControllerContext,
    ) -> Result<()> {
        for controller in &mut self.controllers {
            controller.on_start(ctx)?;
        }
        // The pass below evaluates under the snapshot we start with; a
        // later broadcast carrying the same policy is a duplicate.
        self.last_restrictions = Some(ctx.restrictions);
        self.refresh(screen, ctx)
    }

    /// The display/update pass, in registration order.
    ///
    /// For each controller: recompute availability; displayed controllers
    /// get their binding attached (an absent key is a logged no-op), their
    /// element shown and its enabled state derived from the status, then
    /// `update_state`; the others are skipped and their element, if
    /// present, is hidden.
    pub fn refresh(
        &mut self,
        screen: &mut PreferenceScreen,
        ctx: &ControllerContext,
    ) -> Result<()> {
        for controller in &mut self.controllers {
            let key = controller.key();
            let status = controller.availability(ctx);
            if status.is_displayed() {
                if controller.binding_mut().attach(screen)? {
                    // Attach just confirmed presence.
                    if let Some(pref) = screen.get_mut(key) {
                        pref.set_visible(true);
                        pref.set_enabled(status.is_interactive());
                        controller.update_state(pref, ctx);
                    }
                }
            } else {
                trace!(key = %key, %status, "controller skipped in refresh");
                if let Some(pref) = screen.get_mut(key) {
                    pref.set_visible(false);
                }
            }
        }
        Ok(())
    }

    /// Propagate a restriction change, then re-run the display/update pass
    /// for all controllers (a restriction change can alter which are
    /// available).
    ///
    /// Short-circuits when the incoming snapshot carries the same policy as
    /// the last-delivered one, so duplicate broadcasts cause no UI churn.
    /// Returns whether the change was delivered.
    pub fn notify_restrictions_changed(
        &mut self,
        restrictions: &UxRestrictions,
        screen: &mut PreferenceScreen,
        ctx: &mut ControllerContext,
    ) -> Result<bool> {
        if let Some(last) = &self.last_restrictions {
            if last.same_policy(restrictions) {
                debug!(
                    screen = self.screen_name,
                    "duplicate restriction broadcast suppressed"
                );
                return Ok(false);
            }
        }
        self.last_restrictions = Some(*restrictions);

        for controller in &mut self.controllers {
            let pref = screen.get_mut(controller.key());
            controller.on_restrictions_changed(restrictions, pref, ctx);
        }
        self.refresh(screen, ctx)?;
        Ok(true)
    }

    /// Deliver a platform broadcast to the controllers holding a live
    /// subscription for its topic, then refresh (the event may have changed
    /// availability). No subscriber, no work.
    pub fn deliver_event(
        &mut self,
        event: &PlatformEvent,
        screen: &mut PreferenceScreen,
        ctx: &mut ControllerContext,
    ) -> Result<()> {
        let topic = event.topic();
        let mut delivered = 0usize;
        for controller in &mut self.controllers {
            let subscribed = controller
                .subscription()
                .map(|s| s.matches(topic))
                .unwrap_or(false);
            if subscribed {
                controller.on_event(event, ctx);
                delivered += 1;
            }
        }
        if delivered > 0 {
            debug!(?event, delivered, "platform event delivered");
            self.refresh(screen, ctx)?;
        }
        Ok(())
    }

    /// Route a click to the controller bound to `key`. No bound controller
    /// means "not handled" with no controller method invocation.
    pub fn dispatch_click(
        &mut self,
        key: PreferenceKey,
        screen: &mut PreferenceScreen,
        ctx: &mut ControllerContext,
    ) -> ClickOutcome {
        for controller in &mut self.controllers {
            if controller.key() == key && controller.binding().is_attached() {
                if let Some(pref) = screen.get_mut(key) {
                    return controller.handle_click(pref, ctx);
                }
            }
        }
        ClickOutcome::NotHandled
    }

    /// `on_stop` in reverse registration order, so listeners registered
    /// late are torn down first.
    pub fn stop(&mut self, ctx: &mut ControllerContext) {
        for controller in self.controllers.iter_mut().rev() {
            controller.on_stop(ctx);
        }
    }

    /// `on_destroy` in reverse registration order.
    pub fn destroy(&mut self, ctx: &mut ControllerContext) {
        for controller in self.controllers.iter_mut().rev() {
            controller.on_destroy(ctx);
        }
        debug!(screen = self.screen_name, "controllers destroyed");
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

#[cfg(test)]
mod tests;
