//! Wi-Fi screen: radio toggle plus connected-network details.

use cabin_core::prelude::*;
use cabin_core::{AvailabilityStatus, EventTopic};
use cabin_platform::ListenerHandle;

use crate::controller::{Binding, ClickOutcome, ControllerContext, Effect, PreferenceController};
use crate::preference::{Preference, PreferenceScreen, WidgetKind};
use crate::screen::{RestrictionGate, ScreenDeclaration, ScreenId};

pub mod keys {
    use crate::preference::PreferenceKey;

    pub const WIFI_TOGGLE: PreferenceKey = PreferenceKey::new("wifi_toggle");
    pub const NETWORK: PreferenceKey = PreferenceKey::new("wifi_network");
    pub const SUBNET: PreferenceKey = PreferenceKey::new("wifi_subnet");
}

pub(crate) fn declaration() -> ScreenDeclaration {
    ScreenDeclaration {
        id: ScreenId::Wifi,
        gate: RestrictionGate::DistractionOptimized,
        listens_for_restrictions: true,
        build: build_preferences,
        controllers: vec![
            || Box::new(WifiToggleController::new()),
            || Box::new(WifiNetworkController::new()),
            || Box::new(WifiSubnetController::new()),
        ],
    }
}

fn build_preferences() -> Result<PreferenceScreen> {
    let mut screen = PreferenceScreen::new("wifi");
    screen.add(
        Preference::new(keys::WIFI_TOGGLE, WidgetKind::Toggle, "Wi-Fi").with_icon("wifi"),
    )?;
    screen.add(Preference::new(
        keys::NETWORK,
        WidgetKind::Summary,
        "Network",
    ))?;
    screen.add(Preference::new(
        keys::SUBNET,
        WidgetKind::Summary,
        "Subnet mask",
    ))?;
    Ok(screen)
}

/// Shared availability of the detail rows: they exist only while a
/// network is associated.
fn detail_availability(ctx: &ControllerContext) -> AvailabilityStatus {
    if !ctx.platform.wifi.is_present() {
        AvailabilityStatus::UnsupportedOnDevice
    } else if ctx.platform.wifi.connected_network().is_none() {
        AvailabilityStatus::ConditionallyUnavailable
    } else {
        AvailabilityStatus::Available
    }
}

/// Radio on/off switch; keeps its toggle state in sync with the radio and
/// persists changes.
pub struct WifiToggleController {
    binding: Binding,
    subscription: Option<ListenerHandle>,
}

impl WifiToggleController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::WIFI_TOGGLE, WidgetKind::Toggle),
            subscription: None,
        }
    }
}

impl PreferenceController for WifiToggleController {
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

    fn on_start(&mut self, ctx: &mut ControllerContext) -> Result<()> {
        self.subscription = Some(ctx.listeners.subscribe(EventTopic::WifiStateChanged));
        Ok(())
    }

    fn on_stop(&mut self, _ctx: &mut ControllerContext) {
        self.subscription = None;
    }

    fn update_state(&mut self, preference: &mut Preference, ctx: &ControllerContext) {
        let enabled = ctx.platform.wifi.is_enabled();
        preference.set_checked(enabled);
        preference.set_summary(if enabled { "On" } else { "Off" });
    }

    fn handle_click(
        &mut self,
        preference: &mut Preference,
        ctx: &mut ControllerContext,
    ) -> ClickOutcome {
        let target = !ctx.platform.wifi.is_enabled();
        match ctx.platform.wifi.set_enabled(target) {
            Ok(()) => {
                preference.set_checked(target);
                ctx.push_effect(Effect::PersistSettings);
                ctx.push_effect(Effect::RefreshScreen);
            }
            Err(e) => warn!("could not switch wifi radio: {e}"),
        }
        ClickOutcome::Handled
    }

    fn subscription(&self) -> Option<&ListenerHandle> {
        self.subscription.as_ref()
    }
}

/// Connected network name and address.
pub struct WifiNetworkController {
    binding: Binding,
}

impl WifiNetworkController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::NETWORK, WidgetKind::Summary),
        }
    }
}

impl PreferenceController for WifiNetworkController {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    fn availability(&self, ctx: &ControllerContext) -> AvailabilityStatus {
        detail_availability(ctx)
    }

    fn update_state(&mut self, preference: &mut Preference, ctx: &ControllerContext) {
        if let Some(network) = ctx.platform.wifi.connected_network() {
            preference.set_summary(format!("{} ({})", network.ssid, network.ip_address));
        }
    }
}

/// Subnet mask of the connected network.
pub struct WifiSubnetController {
    binding: Binding,
}

impl WifiSubnetController {
    pub fn new() -> Self {
        Self {
            binding: Binding::typed(keys::SUBNET, WidgetKind::Summary),
        }
    }
}

impl PreferenceController for WifiSubnetController {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    fn availability(&self, ctx: &ControllerContext) -> AvailabilityStatus {
        detail_availability(ctx)
    }

    fn update_state(&mut self, preference: &mut Preference, ctx: &ControllerContext) {
        if let Some(network) = ctx.platform.wifi.connected_network() {
            preference.set_summary(network.subnet_mask);
        }
    }
}
