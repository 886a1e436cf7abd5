//! Preference controller contract.
//!
//! A controller is the unit of business logic behind one preference row.
//! Controllers are constructed once per screen instantiation, receive
//! ordered lifecycle calls from the registry, and mutate only the element
//! their binding has attached to.

use cabin_core::prelude::*;
use cabin_core::{AvailabilityStatus, PlatformEvent, UxRestrictions};
use cabin_platform::{ListenerHandle, ListenerHub, Platform, UserId};

use crate::dialog::Dialog;
use crate::preference::{Preference, PreferenceKey, PreferenceScreen, WidgetKind};
use crate::screen::ScreenId;

/// Whether a controller consumed a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Click fully handled; default navigation is suppressed.
    Handled,
    /// Click declined; the element's target screen (if any) is opened.
    NotHandled,
}

/// Background work a controller may request. The shell stamps each request
/// with the owning screen's generation before it leaves the dispatch path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    RemoveUser { user: UserId },
}

/// A [`TaskKind`] stamped with the generation of the screen that requested
/// it. Completions for a stale generation are dropped, never delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    pub kind: TaskKind,
    pub generation: u64,
}

/// Side effects a controller may request during a dispatch. Drained and
/// executed by the shell after the controller call returns.
#[derive(Debug, Clone)]
pub enum Effect {
    LaunchScreen(ScreenId),
    GoBack,
    ShowDialog(Dialog),
    DismissDialog { tag: &'static str },
    ShowBlockingMessage,
    SpawnTask(TaskKind),
    /// Re-run the active screen's display/update pass.
    RefreshScreen,
    /// Write the persistable settings values to disk.
    PersistSettings,
}

/// Everything a controller call may consult: the platform services, the
/// current restriction snapshot, and the listener hub.
///
/// The restriction snapshot is read-only and replaced wholesale between
/// dispatches; no controller mutates it.
pub struct ControllerContext {
    pub platform: Platform,
    pub restrictions: UxRestrictions,
    pub listeners: ListenerHub,
    effects: Vec<Effect>,
}

impl ControllerContext {
    pub fn new(platform: Platform, restrictions: UxRestrictions, listeners: ListenerHub) -> Self {
        Self {
            platform,
            restrictions,
            listeners,
            effects: Vec::new(),
        }
    }

    /// Queue a side effect for the shell to execute after this dispatch.
    pub fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

/// Typed binding to one preference element, composed into every controller.
///
/// Binding is idempotent: re-attaching with the same key only re-checks
/// presence. A key absent from the displayed tree is an expected, logged
/// no-op; a widget-kind mismatch is a fatal configuration error.
#[derive(Debug)]
pub struct Binding {
    key: PreferenceKey,
    expects: Option<WidgetKind>,
    attached: bool,
}

impl Binding {
    pub fn new(key: impl Into<PreferenceKey>) -> Self {
        Self {
            key: key.into(),
            expects: None,
            attached: false,
        }
    }

    /// Binding that requires the element to be of one widget kind.
    pub fn typed(key: impl Into<PreferenceKey>, kind: WidgetKind) -> Self {
        Self {
            key: key.into(),
            expects: Some(kind),
            attached: false,
        }
    }

    pub fn key(&self) -> PreferenceKey {
        self.key
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Attach to the element in `screen`, if present.
    ///
    /// Returns `Ok(true)` when attached, `Ok(false)` when the key is not in
    /// the tree (expected when availability changed), `Err` on widget-kind
    /// mismatch.
    pub fn attach(&mut self, screen: &PreferenceScreen) -> Result<bool> {
        match screen.get(self.key) {
            Some(pref) => {
                if let Some(expected) = self.expects {
                    if pref.widget() != expected {
                        return Err(Error::widget_mismatch(
                            self.key.as_str(),
                            expected.to_string(),
                            pref.widget().to_string(),
                        ));
                    }
                }
                self.attached = true;
                Ok(true)
            }
            None => {
                debug!(key = %self.key, "preference not in tree, skipping bind");
                self.attached = false;
                Ok(false)
            }
        }
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }
}

/// The controller contract driven by [`ControllerRegistry`].
///
/// Lifecycle calls arrive strictly ordered: `on_create` → `on_start` →
/// repeatable (`on_restrictions_changed`, `on_event`, clicks, refreshes) →
/// `on_stop` → `on_destroy`. Controllers that acquire listeners in
/// `on_start` must release them in `on_stop`; an unbalanced pair is a
/// resource leak.
///
/// [`ControllerRegistry`]: crate::registry::ControllerRegistry
pub trait PreferenceController {
    fn binding(&self) -> &Binding;

    fn binding_mut(&mut self) -> &mut Binding;

    fn key(&self) -> PreferenceKey {
        self.binding().key()
    }

    /// Compute the feature's availability from current external state.
    ///
    /// Must be cheap and side-effect free; it runs on every refresh cycle.
    /// Transient platform failures degrade to a non-displayed status here,
    /// they are never propagated.
    fn availability(&self, ctx: &ControllerContext) -> AvailabilityStatus;

    /// Failure aborts screen initialization; it is a programming error,
    /// not a recoverable runtime condition.
    fn on_create(&mut self, _ctx: &mut ControllerContext) -> Result<()> {
        Ok(())
    }

    fn on_start(&mut self, _ctx: &mut ControllerContext) -> Result<()> {
        Ok(())
    }

    fn on_stop(&mut self, _ctx: &mut ControllerContext) {}

    fn on_destroy(&mut self, _ctx: &mut ControllerContext) {}

    /// Push derived values (summary, icon, toggle state) onto the bound
    /// element. Called only while the controller is displayed; must be
    /// idempotent.
    ///
    /// The refresh pass has already set visibility and the default enabled
    /// state from the availability status; `update_state` may refine
    /// `enabled` further (progressive disclosure under restriction).
    fn update_state(&mut self, _preference: &mut Preference, _ctx: &ControllerContext) {}

    fn handle_click(
        &mut self,
        _preference: &mut Preference,
        _ctx: &mut ControllerContext,
    ) -> ClickOutcome {
        ClickOutcome::NotHandled
    }

    /// A new restriction snapshot was delivered. The registry re-runs the
    /// display/update pass for every controller immediately afterwards, so
    /// the default is a no-op; override to adjust individual actions inside
    /// an otherwise-visible element.
    fn on_restrictions_changed(
        &mut self,
        _restrictions: &UxRestrictions,
        _preference: Option<&mut Preference>,
        _ctx: &mut ControllerContext,
    ) {
    }

    /// A subscribed platform broadcast arrived. Only called while
    /// [`subscription`](Self::subscription) returns a live handle matching
    /// the event's topic.
    fn on_event(&mut self, _event: &PlatformEvent, _ctx: &mut ControllerContext) {}

    /// The controller's broadcast registration, if it holds one.
    fn subscription(&self) -> Option<&ListenerHandle> {
        None
    }
}
