//! Criteria matching against the sending application
//!
//! Every present criterion must equal the corresponding
//! [`ApplicationInfo`] field exactly. Empty criteria match any application,
//! including a lookup miss.

use serde::{Deserialize, Serialize};
use urlbridge_domain::{ApplicationInfo, BridgeError, Result};

/// Expected values for the sending application; `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppCriteria {
    /// Compared with [`ApplicationInfo::localized_name`].
    pub display_name: Option<String>,
    /// Compared with [`ApplicationInfo::bundle_identifier`].
    pub bundle_id: Option<String>,
    /// Compared with [`ApplicationInfo::bundle_url`].
    pub bundle_path: Option<String>,
    /// Compared with [`ApplicationInfo::executable_url`].
    pub executable_path: Option<String>,
}

impl AppCriteria {
    /// Build criteria from `key=value` pairs.
    ///
    /// Keys: `display_name`, `bundle_id`, `bundle_path`, `executable_path`.
    /// A repeated key keeps the last value.
    ///
    /// # Errors
    /// [`BridgeError::InvalidInput`] for an unknown key or a pair without `=`.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut criteria = Self::default();
        for pair in pairs {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                BridgeError::InvalidInput(format!("expected key=value, got '{pair}'"))
            })?;
            criteria.set(key.trim(), value.to_string())?;
        }
        Ok(criteria)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let slot = match key {
            "display_name" => &mut self.display_name,
            "bundle_id" => &mut self.bundle_id,
            "bundle_path" => &mut self.bundle_path,
            "executable_path" => &mut self.executable_path,
            other => {
                return Err(BridgeError::InvalidInput(format!("unknown app criterion '{other}'")))
            }
        };
        *slot = Some(value);
        Ok(())
    }

    /// True when no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.bundle_id.is_none()
            && self.bundle_path.is_none()
            && self.executable_path.is_none()
    }

    /// Whether every present criterion equals the matching field.
    #[must_use]
    pub fn matches(&self, info: &ApplicationInfo) -> bool {
        let checks = [
            (&self.display_name, &info.localized_name),
            (&self.bundle_id, &info.bundle_identifier),
            (&self.bundle_path, &info.bundle_url),
            (&self.executable_path, &info.executable_url),
        ];

        let matched = checks
            .iter()
            .all(|(wanted, actual)| wanted.as_ref().map_or(true, |wanted| wanted == *actual));

        tracing::trace!(matched, bundle_id = %info.bundle_identifier, "app criteria evaluated");
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn safari() -> ApplicationInfo {
        ApplicationInfo {
            localized_name: "Safari".to_string(),
            bundle_identifier: "com.apple.Safari".to_string(),
            bundle_url: "file:///Applications/Safari.app/".to_string(),
            executable_url: "file:///Applications/Safari.app/Contents/MacOS/Safari".to_string(),
        }
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let criteria = AppCriteria::default();
        assert!(criteria.is_empty());
        assert!(criteria.matches(&safari()));
        assert!(criteria.matches(&ApplicationInfo::default()));
    }

    #[test]
    fn test_all_present_fields_must_match() {
        let criteria = AppCriteria::from_pairs([
            "bundle_id=com.apple.Safari",
            "display_name=Safari",
        ])
        .unwrap();
        assert!(criteria.matches(&safari()));

        let wrong = AppCriteria::from_pairs(["bundle_id=com.apple.Safari", "display_name=Chrome"])
            .unwrap();
        assert!(!wrong.matches(&safari()));
    }

    #[test]
    fn test_lookup_miss_fails_non_empty_criteria() {
        let criteria = AppCriteria::from_pairs(["bundle_id=com.apple.Safari"]).unwrap();
        assert!(!criteria.matches(&ApplicationInfo::default()));
    }

    #[test]
    fn test_path_criteria_compare_url_strings() {
        let criteria =
            AppCriteria::from_pairs(["bundle_path=file:///Applications/Safari.app/"]).unwrap();
        assert!(criteria.matches(&safari()));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let criteria = AppCriteria::from_pairs(["display_name=a=b"]).unwrap();
        assert_eq!(criteria.display_name.as_deref(), Some("a=b"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = AppCriteria::from_pairs(["window_title=x"]).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidInput(msg) if msg.contains("window_title")));
    }

    #[test]
    fn test_missing_equals_rejected() {
        assert!(AppCriteria::from_pairs(["bundle_id"]).is_err());
    }

    #[test]
    fn test_deserialize_from_toml_table() {
        let criteria: AppCriteria = toml::from_str(r#"bundle_id = "com.apple.Safari""#).unwrap();
        assert_eq!(criteria.bundle_id.as_deref(), Some("com.apple.Safari"));
        assert!(toml::from_str::<AppCriteria>(r#"pid = "1""#).is_err());
    }
}
