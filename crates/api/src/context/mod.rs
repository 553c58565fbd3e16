//! Probe context - configuration and adapters for one run

use std::time::Duration;

use anyhow::Context;
use urlbridge_core::{AppCriteria, ProcessLookup};
use urlbridge_domain::BridgeConfig;
use urlbridge_infra::{config, observability, NativeProcessLookup};

use crate::args::ProbeArgs;

/// Everything one probe run needs.
pub struct ProbeContext {
    /// Effective configuration after files, environment and flags.
    pub config: BridgeConfig,
    /// Criteria from `--match`, checked against the sender.
    pub criteria: AppCriteria,
    lookup: NativeProcessLookup,
}

impl std::fmt::Debug for ProbeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeContext")
            .field("config", &self.config)
            .field("criteria", &self.criteria)
            .finish_non_exhaustive()
    }
}

impl ProbeContext {
    /// Load config, install logging and build the adapters.
    ///
    /// `--config` replaces file probing; environment overrides still apply.
    ///
    /// # Errors
    /// Unreadable or invalid config, a logger that is already installed, or
    /// a malformed `--match` pair.
    pub fn initialize(args: &ProbeArgs) -> anyhow::Result<Self> {
        let config = Self::load_config(args)?;
        observability::init_logging(&config).context("failed to initialize logging")?;

        let criteria = AppCriteria::from_pairs(args.criteria.iter().map(String::as_str))
            .context("invalid --match criterion")?;

        Ok(Self { config, criteria, lookup: NativeProcessLookup::default() })
    }

    /// Build a context without touching the global log subscriber.
    #[must_use]
    pub fn with_config(config: BridgeConfig, criteria: AppCriteria) -> Self {
        Self { config, criteria, lookup: NativeProcessLookup::default() }
    }

    fn load_config(args: &ProbeArgs) -> anyhow::Result<BridgeConfig> {
        let mut config = match &args.config_path {
            Some(path) => config::load_from_env(config::load_from_file(Some(path.clone()))?)?,
            None => config::load()?,
        };
        if let Some(timeout_ms) = args.timeout_ms {
            config.wait_timeout_ms = timeout_ms;
        }
        Ok(config)
    }

    /// Process lookup for the current platform.
    #[must_use]
    pub fn lookup(&self) -> &dyn ProcessLookup {
        &self.lookup
    }

    /// How long the run waits for a URL.
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        self.config.wait_timeout()
    }
}
