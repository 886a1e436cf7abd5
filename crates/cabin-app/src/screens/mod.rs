//! Screen declarations and their controllers.
//!
//! This is the static screen-declaration boundary: one entry per
//! [`ScreenId`], each supplying the element tree and the ordered
//! controller list the registry instantiates at create time.

pub mod datetime;
pub mod home;
pub mod system;
pub mod users;
pub mod wifi;

use crate::screen::{ScreenDeclaration, ScreenId};

/// The declaration for `id`. Total over all screen identities.
pub fn declaration(id: ScreenId) -> ScreenDeclaration {
    match id {
        ScreenId::Home => home::declaration(),
        ScreenId::System => system::declaration(),
        ScreenId::Users => users::declaration(),
        ScreenId::Wifi => wifi::declaration(),
        ScreenId::DateTime => datetime::declaration(),
    }
}
