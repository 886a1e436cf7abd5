//! Screen identity and declarations.
//!
//! A screen is declared statically: its identity, its restriction gate,
//! whether it listens for restriction changes, a builder for its element
//! tree, and the ordered list of controller factories the registry
//! instantiates at create time.

use cabin_core::prelude::*;
use cabin_core::UxRestrictions;

use crate::controller::PreferenceController;
use crate::preference::PreferenceScreen;

/// Identity of one navigable screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Home,
    System,
    Users,
    Wifi,
    DateTime,
}

impl ScreenId {
    pub fn title(&self) -> &'static str {
        match self {
            ScreenId::Home => "Settings",
            ScreenId::System => "System",
            ScreenId::Users => "Users",
            ScreenId::Wifi => "Wi-Fi",
            ScreenId::DateTime => "Date & time",
        }
    }

    /// Parse a command-line/driver name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "home" => Some(ScreenId::Home),
            "system" => Some(ScreenId::System),
            "users" => Some(ScreenId::Users),
            "wifi" => Some(ScreenId::Wifi),
            "datetime" => Some(ScreenId::DateTime),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScreenId::Home => "home",
            ScreenId::System => "system",
            ScreenId::Users => "users",
            ScreenId::Wifi => "wifi",
            ScreenId::DateTime => "datetime",
        };
        write!(f, "{name}")
    }
}

/// The screen's declared capability under driving restrictions.
///
/// Screens that never declare one are `Unaware` and always showable
/// (opt-out, not opt-in), preserving behavior for simple screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestrictionGate {
    /// No declaration; treated as always showable.
    #[default]
    Unaware,
    /// Declared distraction-optimized; showable while driving.
    DistractionOptimized,
    /// Requires the vehicle parked; blocked under elevated restriction.
    RequiresParked,
}

impl RestrictionGate {
    /// Whether a screen with this gate may be shown under `restrictions`.
    pub fn can_be_shown(&self, restrictions: &UxRestrictions) -> bool {
        match self {
            RestrictionGate::Unaware | RestrictionGate::DistractionOptimized => true,
            RestrictionGate::RequiresParked => restrictions.setup_allowed(),
        }
    }
}

/// Factory for one controller instance.
pub type ControllerFactory = fn() -> Box<dyn PreferenceController>;

/// Static declaration of one screen: identity, restriction capabilities,
/// element tree builder, and ordered controller factories.
pub struct ScreenDeclaration {
    pub id: ScreenId,
    pub gate: RestrictionGate,
    /// The optional restriction-listener capability. The host queries this
    /// once per activation; screens that opt out never receive restriction
    /// notifications (the blocking overlay is still evaluated for them).
    pub listens_for_restrictions: bool,
    pub build: fn() -> Result<PreferenceScreen>,
    pub controllers: Vec<ControllerFactory>,
}

impl ScreenDeclaration {
    pub fn can_be_shown(&self, restrictions: &UxRestrictions) -> bool {
        self.gate.can_be_shown(restrictions)
    }

    /// Run every declared factory, in declaration order.
    pub fn instantiate_controllers(&self) -> Vec<Box<dyn PreferenceController>> {
        self.controllers.iter().map(|factory| factory()).collect()
    }
}
