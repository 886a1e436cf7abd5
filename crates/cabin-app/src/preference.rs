//! Preference element model.
//!
//! A [`PreferenceScreen`] is the displayed element tree of one screen:
//! an ordered set of [`Preference`] rows addressed by stable string keys.
//! Controllers never own elements; they mutate them through the registry's
//! refresh pass.

use cabin_core::prelude::*;

use crate::screen::ScreenId;

/// Stable key identifying one UI element within a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreferenceKey(&'static str);

impl PreferenceKey {
    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&'static str> for PreferenceKey {
    fn from(key: &'static str) -> Self {
        Self(key)
    }
}

/// Element type a preference renders as. Typed bindings check this and
/// fail fast on mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Navigates to another screen when clicked.
    Entry,
    /// Two-state switch.
    Toggle,
    /// Performs an action when clicked.
    Action,
    /// Read-only information row.
    Summary,
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WidgetKind::Entry => "Entry",
            WidgetKind::Toggle => "Toggle",
            WidgetKind::Action => "Action",
            WidgetKind::Summary => "Summary",
        };
        write!(f, "{label}")
    }
}

/// One row in a preference screen.
#[derive(Debug, Clone)]
pub struct Preference {
    key: PreferenceKey,
    widget: WidgetKind,
    title: String,
    summary: Option<String>,
    icon: Option<&'static str>,
    enabled: bool,
    visible: bool,
    checked: bool,
    target_screen: Option<ScreenId>,
}

impl Preference {
    pub fn new(key: impl Into<PreferenceKey>, widget: WidgetKind, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            widget,
            title: title.into(),
            summary: None,
            icon: None,
            enabled: true,
            visible: true,
            checked: false,
            target_screen: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Screen opened by default navigation when no controller handles the
    /// click.
    pub fn with_target(mut self, target: ScreenId) -> Self {
        self.target_screen = Some(target);
        self
    }

    pub fn key(&self) -> PreferenceKey {
        self.key
    }

    pub fn widget(&self) -> WidgetKind {
        self.widget
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn icon(&self) -> Option<&'static str> {
        self.icon
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn target_screen(&self) -> Option<ScreenId> {
        self.target_screen
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
    }

    pub fn clear_summary(&mut self) {
        self.summary = None;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }
}

/// Ordered element tree of one screen. Insertion order is display and
/// evaluation order.
#[derive(Debug, Clone)]
pub struct PreferenceScreen {
    name: &'static str,
    items: Vec<Preference>,
}

impl PreferenceScreen {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            items: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Append a preference. Duplicate keys within one screen are a fatal
    /// configuration error.
    pub fn add(&mut self, preference: Preference) -> Result<()> {
        if self.contains(preference.key()) {
            return Err(Error::duplicate_key(preference.key().as_str(), self.name));
        }
        self.items.push(preference);
        Ok(())
    }

    pub fn contains(&self, key: PreferenceKey) -> bool {
        self.items.iter().any(|p| p.key() == key)
    }

    /// By-key lookup: absent-or-present, never an error.
    pub fn get(&self, key: PreferenceKey) -> Option<&Preference> {
        self.items.iter().find(|p| p.key() == key)
    }

    pub fn get_mut(&mut self, key: PreferenceKey) -> Option<&mut Preference> {
        self.items.iter_mut().find(|p| p.key() == key)
    }

    /// Resolve a runtime string (e.g. typed input) to a key in this tree.
    pub fn find_key(&self, name: &str) -> Option<PreferenceKey> {
        self.items
            .iter()
            .find(|p| p.key().as_str() == name)
            .map(|p| p.key())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preference> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_with(keys: &[&'static str]) -> PreferenceScreen {
        let mut screen = PreferenceScreen::new("test");
        for key in keys {
            screen
                .add(Preference::new(*key, WidgetKind::Summary, *key))
                .unwrap();
        }
        screen
    }

    #[test]
    fn test_insertion_order_preserved() {
        let screen = screen_with(&["a", "b", "c"]);
        let order: Vec<_> = screen.iter().map(|p| p.key().as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_key_is_fatal() {
        let mut screen = screen_with(&["a"]);
        let err = screen
            .add(Preference::new("a", WidgetKind::Toggle, "again"))
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_lookup_absent_returns_none() {
        let screen = screen_with(&["a"]);
        assert!(screen.get(PreferenceKey::new("missing")).is_none());
        assert!(screen.find_key("missing").is_none());
    }

    #[test]
    fn test_preference_defaults() {
        let pref = Preference::new("k", WidgetKind::Toggle, "Title");
        assert!(pref.is_enabled());
        assert!(pref.is_visible());
        assert!(!pref.is_checked());
        assert!(pref.summary().is_none());
        assert!(pref.target_screen().is_none());
    }

    #[test]
    fn test_builder_and_setters() {
        let mut pref = Preference::new("k", WidgetKind::Entry, "Wi-Fi")
            .with_summary("Connected")
            .with_icon("wifi")
            .with_target(ScreenId::Wifi);
        assert_eq!(pref.summary(), Some("Connected"));
        assert_eq!(pref.target_screen(), Some(ScreenId::Wifi));

        pref.set_summary("Off");
        pref.set_enabled(false);
        pref.set_visible(false);
        assert_eq!(pref.summary(), Some("Off"));
        assert!(!pref.is_enabled());
        assert!(!pref.is_visible());
    }
}
