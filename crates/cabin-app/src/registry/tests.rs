//! Registry lifecycle and propagation tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cabin_core::{AvailabilityStatus, EventTopic, PlatformEvent, UxRestrictions};
use cabin_platform::{ListenerHandle, ListenerHub, SimulatedVehicle};

use super::*;
use crate::controller::Binding;
use crate::preference::{Preference, WidgetKind};

/// Shared call journal recording controller method invocations in order.
#[derive(Debug, Default)]
struct Journal {
    calls: RefCell<Vec<String>>,
}

impl Journal {
    fn log(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn count_of(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

/// Scripted controller: fixed key, settable availability, records every
/// lifecycle call, optionally subscribes to a topic while started.
struct StubController {
    binding: Binding,
    journal: Rc<Journal>,
    status: Rc<Cell<AvailabilityStatus>>,
    subscribe_to: Option<EventTopic>,
    subscription: Option<ListenerHandle>,
}

impl StubController {
    fn boxed(
        key: &'static str,
        status: AvailabilityStatus,
        journal: &Rc<Journal>,
    ) -> (Box<dyn PreferenceController>, Rc<Cell<AvailabilityStatus>>) {
        let status = Rc::new(Cell::new(status));
        let controller = Box::new(StubController {
            binding: Binding::new(key),
            journal: journal.clone(),
            status: status.clone(),
            subscribe_to: None,
            subscription: None,
        });
        (controller, status)
    }

    fn subscribing(
        key: &'static str,
        topic: EventTopic,
        journal: &Rc<Journal>,
    ) -> Box<dyn PreferenceController> {
        Box::new(StubController {
            binding: Binding::new(key),
            journal: journal.clone(),
            status: Rc::new(Cell::new(AvailabilityStatus::Available)),
            subscribe_to: Some(topic),
            subscription: None,
        })
    }
}

impl PreferenceController for StubController {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    fn availability(&self, _ctx: &ControllerContext) -> AvailabilityStatus {
        self.status.get()
    }

    fn on_create(&mut self, _ctx: &mut ControllerContext) -> Result<()> {
        self.journal.log(format!("{}:create", self.key()));
        Ok(())
    }

    fn on_start(&mut self, ctx: &mut ControllerContext) -> Result<()> {
        self.journal.log(format!("{}:start", self.key()));
        if let Some(topic) = self.subscribe_to {
            self.subscription = Some(ctx.listeners.subscribe(topic));
        }
        Ok(())
    }

    fn on_stop(&mut self, _ctx: &mut ControllerContext) {
        self.journal.log(format!("{}:stop", self.key()));
        self.subscription = None;
    }

    fn on_destroy(&mut self, _ctx: &mut ControllerContext) {
        self.journal.log(format!("{}:destroy", self.key()));
    }

    fn update_state(&mut self, _preference: &mut Preference, _ctx: &ControllerContext) {
        self.journal.log(format!("{}:update", self.key()));
    }

    fn handle_click(
        &mut self,
        _preference: &mut Preference,
        _ctx: &mut ControllerContext,
    ) -> ClickOutcome {
        self.journal.log(format!("{}:click", self.key()));
        ClickOutcome::Handled
    }

    fn on_restrictions_changed(
        &mut self,
        _restrictions: &UxRestrictions,
        _preference: Option<&mut Preference>,
        _ctx: &mut ControllerContext,
    ) {
        self.journal.log(format!("{}:restrictions", self.key()));
    }

    fn on_event(&mut self, event: &PlatformEvent, _ctx: &mut ControllerContext) {
        self.journal.log(format!("{}:event:{:?}", self.key(), event));
    }

    fn subscription(&self) -> Option<&ListenerHandle> {
        self.subscription.as_ref()
    }
}

fn test_ctx() -> ControllerContext {
    ControllerContext::new(
        SimulatedVehicle::new().platform(),
        UxRestrictions::default(),
        ListenerHub::new(),
    )
}

fn screen_with(keys: &[&'static str]) -> PreferenceScreen {
    let mut screen = PreferenceScreen::new("test");
    for key in keys {
        screen
            .add(Preference::new(*key, WidgetKind::Action, *key))
            .unwrap();
    }
    screen
}

#[test]
fn test_create_runs_on_create_in_declaration_order() {
    let journal = Rc::new(Journal::default());
    let screen = screen_with(&["a", "b"]);
    let (a, _) = StubController::boxed("a", AvailabilityStatus::Available, &journal);
    let (b, _) = StubController::boxed("b", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    ControllerRegistry::create(&screen, vec![a, b], &mut ctx).unwrap();

    assert_eq!(journal.calls(), ["a:create", "b:create"]);
}

#[test]
fn test_create_rejects_duplicate_keys() {
    let journal = Rc::new(Journal::default());
    let screen = screen_with(&["a"]);
    let (first, _) = StubController::boxed("a", AvailabilityStatus::Available, &journal);
    let (second, _) = StubController::boxed("a", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let err = ControllerRegistry::create(&screen, vec![first, second], &mut ctx).unwrap_err();
    assert!(err.is_fatal());
    // No lifecycle hook ran.
    assert!(journal.calls().is_empty());
}

#[test]
fn test_create_rejects_unknown_key() {
    let journal = Rc::new(Journal::default());
    let screen = screen_with(&["a"]);
    let (orphan, _) = StubController::boxed("ghost", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let err = ControllerRegistry::create(&screen, vec![orphan], &mut ctx).unwrap_err();
    assert!(matches!(err, Error::UnknownKey { .. }));
}

#[test]
fn test_start_updates_only_displayed_controllers() {
    // summary: AVAILABLE, adminOnly: DISABLED_FOR_USER,
    // restricted: CONDITIONALLY_UNAVAILABLE
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["summary", "admin_only", "restricted"]);
    let (summary, _) = StubController::boxed("summary", AvailabilityStatus::Available, &journal);
    let (admin, _) = StubController::boxed("admin_only", AvailabilityStatus::DisabledForUser, &journal);
    let (restricted, _) = StubController::boxed(
        "restricted",
        AvailabilityStatus::ConditionallyUnavailable,
        &journal,
    );

    let mut ctx = test_ctx();
    let mut registry =
        ControllerRegistry::create(&screen, vec![summary, admin, restricted], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();

    assert_eq!(journal.count_of("summary:update"), 1);
    assert_eq!(journal.count_of("admin_only:update"), 1);
    assert_eq!(journal.count_of("restricted:update"), 0);

    // Displayed elements are visible; the skipped one is hidden.
    assert!(screen.get(PreferenceKey::new("summary")).unwrap().is_visible());
    assert!(screen.get(PreferenceKey::new("summary")).unwrap().is_enabled());
    let admin_pref = screen.get(PreferenceKey::new("admin_only")).unwrap();
    assert!(admin_pref.is_visible());
    assert!(!admin_pref.is_enabled());
    assert!(!screen.get(PreferenceKey::new("restricted")).unwrap().is_visible());
}

#[test]
fn test_unsupported_controller_is_hidden_and_skipped() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["a"]);
    let (a, _) = StubController::boxed("a", AvailabilityStatus::UnsupportedOnDevice, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();

    assert_eq!(journal.count_of("a:update"), 0);
    assert!(!screen.get(PreferenceKey::new("a")).unwrap().is_visible());
}

#[test]
fn test_availability_change_between_refreshes() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["a"]);
    let (a, status) = StubController::boxed("a", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();
    assert!(screen.get(PreferenceKey::new("a")).unwrap().is_visible());

    status.set(AvailabilityStatus::ConditionallyUnavailable);
    registry.refresh(&mut screen, &ctx).unwrap();
    assert!(!screen.get(PreferenceKey::new("a")).unwrap().is_visible());

    status.set(AvailabilityStatus::Available);
    registry.refresh(&mut screen, &ctx).unwrap();
    assert!(screen.get(PreferenceKey::new("a")).unwrap().is_visible());
}

#[test]
fn test_controller_for_absent_key_is_skipped_not_removed() {
    let journal = Rc::new(Journal::default());
    // Declared tree contains both keys; the displayed tree loses "b".
    let screen = screen_with(&["a", "b"]);
    let (a, _) = StubController::boxed("a", AvailabilityStatus::Available, &journal);
    let (b, _) = StubController::boxed("b", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a, b], &mut ctx).unwrap();

    let mut displayed = screen_with(&["a"]);
    registry.start(&mut displayed, &mut ctx).unwrap();

    // "b" silently skipped this pass...
    assert_eq!(journal.count_of("a:update"), 1);
    assert_eq!(journal.count_of("b:update"), 0);

    // ...but still refreshed once its element reappears.
    let mut full = screen_with(&["a", "b"]);
    registry.refresh(&mut full, &ctx).unwrap();
    assert_eq!(journal.count_of("b:update"), 1);
}

#[test]
fn test_start_stop_leaves_no_listeners() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["time", "wifi"]);
    let time = StubController::subscribing("time", EventTopic::TimeChanged, &journal);
    let wifi = StubController::subscribing("wifi", EventTopic::WifiStateChanged, &journal);

    let mut ctx = test_ctx();
    let hub = ctx.listeners.clone();
    let mut registry = ControllerRegistry::create(&screen, vec![time, wifi], &mut ctx).unwrap();

    registry.start(&mut screen, &mut ctx).unwrap();
    assert_eq!(hub.active_count(), 2);

    registry.stop(&mut ctx);
    assert_eq!(hub.active_count(), 0);

    // A second start/stop cycle pairs up again.
    registry.start(&mut screen, &mut ctx).unwrap();
    assert_eq!(hub.active_count(), 2);
    registry.stop(&mut ctx);
    assert_eq!(hub.active_count(), 0);
}

#[test]
fn test_duplicate_restriction_context_is_suppressed() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["a"]);
    let (a, _) = StubController::boxed("a", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();
    journal.clear();

    // Same policy as the start snapshot, newer timestamp: suppressed.
    let same = UxRestrictions {
        timestamp_ms: 999,
        ..UxRestrictions::default()
    };
    let delivered = registry
        .notify_restrictions_changed(&same, &mut screen, &mut ctx)
        .unwrap();
    assert!(!delivered);
    assert_eq!(journal.count_of("a:restrictions"), 0);
    assert_eq!(journal.count_of("a:update"), 0);
}

#[test]
fn test_distinct_restriction_context_delivered_exactly_once() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["a", "b"]);
    let (a, _) = StubController::boxed("a", AvailabilityStatus::Available, &journal);
    let (b, _) = StubController::boxed("b", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a, b], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();
    journal.clear();

    let elevated = UxRestrictions::elevated(100);
    ctx.restrictions = elevated;
    let delivered = registry
        .notify_restrictions_changed(&elevated, &mut screen, &mut ctx)
        .unwrap();
    assert!(delivered);

    // One notification and one refresh per controller.
    assert_eq!(journal.count_of("a:restrictions"), 1);
    assert_eq!(journal.count_of("b:restrictions"), 1);
    assert_eq!(journal.count_of("a:update"), 1);
    assert_eq!(journal.count_of("b:update"), 1);

    // Redelivering the same policy is now suppressed.
    journal.clear();
    let redelivery = UxRestrictions::elevated(200);
    let delivered = registry
        .notify_restrictions_changed(&redelivery, &mut screen, &mut ctx)
        .unwrap();
    assert!(!delivered);
    assert!(journal.calls().is_empty());
}

#[test]
fn test_restriction_notification_precedes_refresh() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["a"]);
    let (a, _) = StubController::boxed("a", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();
    journal.clear();

    let elevated = UxRestrictions::elevated(100);
    registry
        .notify_restrictions_changed(&elevated, &mut screen, &mut ctx)
        .unwrap();
    assert_eq!(journal.calls(), ["a:restrictions", "a:update"]);
}

#[test]
fn test_dispatch_click_without_bound_controller() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["a", "free"]);
    let (a, _) = StubController::boxed("a", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();
    journal.clear();

    let outcome = registry.dispatch_click(PreferenceKey::new("free"), &mut screen, &mut ctx);
    assert_eq!(outcome, ClickOutcome::NotHandled);
    assert!(journal.calls().is_empty());
}

#[test]
fn test_dispatch_click_routes_to_bound_controller() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["a"]);
    let (a, _) = StubController::boxed("a", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();

    let outcome = registry.dispatch_click(PreferenceKey::new("a"), &mut screen, &mut ctx);
    assert_eq!(outcome, ClickOutcome::Handled);
    assert_eq!(journal.count_of("a:click"), 1);
}

#[test]
fn test_detached_controller_does_not_receive_clicks() {
    let journal = Rc::new(Journal::default());
    let screen = screen_with(&["a"]);
    let (a, _) = StubController::boxed("a", AvailabilityStatus::ConditionallyUnavailable, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a], &mut ctx).unwrap();
    let mut displayed = screen_with(&["a"]);
    registry.start(&mut displayed, &mut ctx).unwrap();

    // Never attached (not displayed), so the click is not routed.
    let outcome = registry.dispatch_click(PreferenceKey::new("a"), &mut displayed, &mut ctx);
    assert_eq!(outcome, ClickOutcome::NotHandled);
    assert_eq!(journal.count_of("a:click"), 0);
}

#[test]
fn test_teardown_runs_in_reverse_order() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["a", "b"]);
    let (a, _) = StubController::boxed("a", AvailabilityStatus::Available, &journal);
    let (b, _) = StubController::boxed("b", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a, b], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();
    journal.clear();

    registry.stop(&mut ctx);
    registry.destroy(&mut ctx);
    assert_eq!(
        journal.calls(),
        ["b:stop", "a:stop", "b:destroy", "a:destroy"]
    );
}

#[test]
fn test_event_delivered_only_to_matching_subscribers() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["time", "wifi", "plain"]);
    let time = StubController::subscribing("time", EventTopic::TimeChanged, &journal);
    let wifi = StubController::subscribing("wifi", EventTopic::WifiStateChanged, &journal);
    let (plain, _) = StubController::boxed("plain", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry =
        ControllerRegistry::create(&screen, vec![time, wifi, plain], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();
    journal.clear();

    registry
        .deliver_event(&PlatformEvent::TimeChanged, &mut screen, &mut ctx)
        .unwrap();

    assert_eq!(journal.count_of("time:event:TimeChanged"), 1);
    assert_eq!(journal.count_of("wifi:event:TimeChanged"), 0);
    // Delivery triggers a refresh pass for the whole screen.
    assert_eq!(journal.count_of("time:update"), 1);
    assert_eq!(journal.count_of("plain:update"), 1);
}

#[test]
fn test_event_without_subscribers_is_dropped() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["plain"]);
    let (plain, _) = StubController::boxed("plain", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![plain], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();
    journal.clear();

    registry
        .deliver_event(&PlatformEvent::UsersChanged, &mut screen, &mut ctx)
        .unwrap();
    assert!(journal.calls().is_empty());
}

#[test]
fn test_stopped_subscriber_does_not_receive_events() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["time"]);
    let time = StubController::subscribing("time", EventTopic::TimeChanged, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![time], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();
    registry.stop(&mut ctx);
    journal.clear();

    registry
        .deliver_event(&PlatformEvent::TimeChanged, &mut screen, &mut ctx)
        .unwrap();
    assert!(journal.calls().is_empty());
}

#[test]
fn test_elevation_demotes_available_controller_to_inert() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["a"]);
    let (a, status) = StubController::boxed("a", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();
    assert!(screen.get(PreferenceKey::new("a")).unwrap().is_enabled());

    // Under the elevated tier this feature is inert for the user.
    status.set(AvailabilityStatus::DisabledForUser);
    let elevated = UxRestrictions::elevated(100);
    ctx.restrictions = elevated;
    registry
        .notify_restrictions_changed(&elevated, &mut screen, &mut ctx)
        .unwrap();

    let pref = screen.get(PreferenceKey::new("a")).unwrap();
    assert!(pref.is_visible());
    assert!(!pref.is_enabled());
    // Still refreshed: DisabledForUser stays in the update pass.
    assert_eq!(journal.count_of("a:update"), 2);
}

#[test]
fn test_refresh_is_idempotent() {
    let journal = Rc::new(Journal::default());
    let mut screen = screen_with(&["a"]);
    let (a, _) = StubController::boxed("a", AvailabilityStatus::Available, &journal);

    let mut ctx = test_ctx();
    let mut registry = ControllerRegistry::create(&screen, vec![a], &mut ctx).unwrap();
    registry.start(&mut screen, &mut ctx).unwrap();

    registry.refresh(&mut screen, &ctx).unwrap();
    registry.refresh(&mut screen, &ctx).unwrap();

    // Three passes (start + two refreshes), same observable element state.
    assert_eq!(journal.count_of("a:update"), 3);
    let pref = screen.get(PreferenceKey::new("a")).unwrap();
    assert!(pref.is_visible());
    assert!(pref.is_enabled());
}
