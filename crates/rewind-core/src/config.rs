use crate::deadline::{
    DeadlineResolver, DEFAULT_DEADLINE_TIME, DEFAULT_GRACE_MINUTES, DEFAULT_TIMEZONE,
};
use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// RewindConfig
// ---------------------------------------------------------------------------

/// Run settings, read from `.rewind.yaml` or an explicit file.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewindConfig {
    /// IANA zone the deadline date is interpreted in.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Wall-clock time of the deadline on its date, `HH:MM`.
    #[serde(default = "default_deadline_time")]
    pub deadline_time: String,

    #[serde(default = "default_grace_minutes")]
    pub grace_minutes: i64,

    /// Remote whose default-branch pointer is consulted during branch selection.
    #[serde(default = "default_remote")]
    pub remote: String,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_deadline_time() -> String {
    DEFAULT_DEADLINE_TIME.to_string()
}

fn default_grace_minutes() -> i64 {
    DEFAULT_GRACE_MINUTES
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Default for RewindConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            deadline_time: default_deadline_time(),
            grace_minutes: default_grace_minutes(),
            remote: default_remote(),
        }
    }
}

impl RewindConfig {
    /// Load from an explicit YAML file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: RewindConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load `<root>/.rewind.yaml` if present, otherwise defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_file(&path)
    }

    /// Validate the zone and time, producing the resolver for this run.
    pub fn resolver(&self) -> Result<DeadlineResolver> {
        DeadlineResolver::from_names(&self.timezone, &self.deadline_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RewindError;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = RewindConfig::load(dir.path()).unwrap();
        assert_eq!(cfg, RewindConfig::default());
        assert_eq!(cfg.timezone, "America/Chicago");
        assert_eq!(cfg.deadline_time, "23:59");
        assert_eq!(cfg.grace_minutes, 5);
        assert_eq!(cfg.remote, "origin");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            paths::config_path(dir.path()),
            "timezone: Europe/Berlin\ngrace_minutes: 15\n",
        )
        .unwrap();
        let cfg = RewindConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.timezone, "Europe/Berlin");
        assert_eq!(cfg.grace_minutes, 15);
        assert_eq!(cfg.deadline_time, "23:59");
        assert_eq!(cfg.remote, "origin");
    }

    #[test]
    fn empty_file_is_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(RewindConfig::load_file(&path).unwrap(), RewindConfig::default());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "grace_minutes: [not a number\n").unwrap();
        assert!(matches!(
            RewindConfig::load_file(&path),
            Err(RewindError::Yaml(_))
        ));
    }

    #[test]
    fn resolver_rejects_unknown_zone() {
        let cfg = RewindConfig {
            timezone: "Nowhere/Special".into(),
            ..RewindConfig::default()
        };
        assert!(matches!(
            cfg.resolver(),
            Err(RewindError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn default_resolver_is_chicago_2359() {
        let resolver = RewindConfig::default().resolver().unwrap();
        assert_eq!(resolver, DeadlineResolver::default());
    }
}
