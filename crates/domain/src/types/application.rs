//! Running-application metadata

use serde::{Deserialize, Serialize};

/// Metadata of the application that owns a process.
///
/// Produced on demand from a pid and never cached. A pid with no running
/// application yields the default value, with every field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationInfo {
    /// Display name in the user's language.
    pub localized_name: String,
    /// Reverse-domain identifier, e.g. `com.apple.Safari`.
    pub bundle_identifier: String,
    /// `absoluteString` of the bundle URL, e.g. `file:///Applications/Safari.app/`
    pub bundle_url: String,
    /// `absoluteString` of the main executable URL.
    pub executable_url: String,
}

impl ApplicationInfo {
    /// True when the lookup found nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.localized_name.is_empty()
            && self.bundle_identifier.is_empty()
            && self.bundle_url.is_empty()
            && self.executable_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(ApplicationInfo::default().is_empty());
    }

    #[test]
    fn test_any_field_makes_non_empty() {
        let info = ApplicationInfo {
            executable_url: "file:///usr/bin/true".to_string(),
            ..ApplicationInfo::default()
        };
        assert!(!info.is_empty());
    }
}
