//! Localization lookup seam.
//!
//! Core only resolves a handful of keys (seed names, reminder title). Hosts
//! plug their own `Localizer`; `BundledLocalizer` ships English defaults.

use std::collections::BTreeMap;

/// Display name of the seeded "personal" category.
pub const KEY_DEFAULT_CATEGORY: &str = "setup.default-category";
/// Display name of the seeded "work" category.
pub const KEY_DEFAULT_CATEGORY_ALT: &str = "setup.default-category-alt";
/// Goal of the seeded starter task.
pub const KEY_GET_STARTED: &str = "Get started";
/// Reminder title template. `@` is replaced by the category name.
pub const KEY_TODO_DUE_TITLE: &str = "notifications.todo.due.title";

const ENGLISH_STRINGS: &[(&str, &str)] = &[
    (KEY_DEFAULT_CATEGORY, "Personal"),
    (KEY_DEFAULT_CATEGORY_ALT, "Work"),
    (KEY_GET_STARTED, "Get started"),
    (KEY_TODO_DUE_TITLE, "Reminder from @"),
];

/// Resolves localization keys to display strings.
pub trait Localizer {
    /// Returns the display string for `key`, or `key` itself when unknown.
    fn localized_string(&self, key: &str) -> String;
}

/// In-process string table with English defaults.
#[derive(Debug, Clone, Default)]
pub struct BundledLocalizer {
    overrides: BTreeMap<String, String>,
}

impl BundledLocalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the string for one key.
    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }
}

impl Localizer for BundledLocalizer {
    fn localized_string(&self, key: &str) -> String {
        if let Some(value) = self.overrides.get(key) {
            return value.clone();
        }
        ENGLISH_STRINGS
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map_or_else(|| key.to_string(), |(_, value)| (*value).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{BundledLocalizer, Localizer, KEY_DEFAULT_CATEGORY, KEY_TODO_DUE_TITLE};

    #[test]
    fn bundled_strings_resolve_and_unknown_keys_echo() {
        let localizer = BundledLocalizer::new();
        assert_eq!(localizer.localized_string(KEY_DEFAULT_CATEGORY), "Personal");
        assert_eq!(localizer.localized_string("missing.key"), "missing.key");
    }

    #[test]
    fn overrides_win_over_bundled_strings() {
        let localizer = BundledLocalizer::new().with_string(KEY_TODO_DUE_TITLE, "@ fällig");
        assert_eq!(localizer.localized_string(KEY_TODO_DUE_TITLE), "@ fällig");
    }
}
