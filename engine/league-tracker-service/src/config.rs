//! Service configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fantasy_platform::PlatformConfig;
use league_core::{LeagueWeek, PlatformPlayerId, StatsPlayerId, TeamId};
use mlb_stats_fetcher::StatsApiConfig;
use player_resolver::ResolverConfig;
use projection_engine::ProjectionConfig;
use request_cache::CacheConfig;
use weekly_engine::WeeklyConfig;

/// Prefix of environment variables layered over the config file
/// (`TRACKER__WEEKLY__ACCEPTANCE_FLOOR=0.6`)
pub const ENV_PREFIX: &str = "TRACKER";

/// Days in every league week
pub const DAYS_PER_WEEK: usize = 7;

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Service-level configuration
    pub service: ServiceSettings,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Statistics provider client
    pub stats_api: StatsApiConfig,

    /// Fantasy platform roster client
    pub platform: PlatformConfig,

    /// Shared request cache settings
    pub cache: CacheConfig,

    /// Player identity resolution
    pub resolver: ResolverSettings,

    pub weekly: WeeklyConfig,

    pub projection: ProjectionConfig,

    /// League weeks supplied by the operator
    pub calendar: CalendarConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Fantasy team IDs reported by league-wide commands
    pub team_ids: Vec<TeamId>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,

    /// Log file path (if None, logs to stderr)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string(), file: None }
    }
}

/// One hand-pinned identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerOverride {
    pub platform_id: PlatformPlayerId,
    pub stats_id: StatsPlayerId,
}

/// Resolver settings in file-friendly form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub overrides: Vec<PlayerOverride>,
    pub extra_team_aliases: HashMap<String, String>,
}

impl ResolverSettings {
    pub fn to_resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            overrides: self.overrides.iter().map(|o| (o.platform_id, o.stats_id)).collect(),
            extra_team_aliases: self.extra_team_aliases.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub weeks: Vec<LeagueWeek>,
}

/// Load configuration from an optional TOML file, `TRACKER__` environment
/// variables and the upstream clients' own environment variables
pub fn load_config(path: Option<&Path>) -> Result<TrackerConfig> {
    let mut config = load_layers(path)?;

    config.stats_api.apply_env();
    config.platform.apply_env();

    validate_config(&config)?;
    Ok(config)
}

fn load_layers(path: Option<&Path>) -> Result<TrackerConfig> {
    let mut builder = ::config::Config::builder();

    if let Some(path) = path {
        tracing::debug!("Loading configuration from file: {:?}", path);
        builder = builder.add_source(::config::File::from(path).required(true));
    }

    builder = builder.add_source(
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .context("Failed to read configuration sources")?
        .try_deserialize()
        .context("Failed to parse configuration")
}

/// Validate configuration
pub fn validate_config(config: &TrackerConfig) -> Result<()> {
    // Validate log level
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    // Validate log format
    match config.logging.format.as_str() {
        "json" | "pretty" | "compact" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    if config.cache.default_ttl_secs == 0 {
        return Err(anyhow::anyhow!("Cache TTL must be positive"));
    }

    if config.stats_api.feeds.is_empty() {
        return Err(anyhow::anyhow!("At least one daily stat feed must be configured"));
    }

    for (name, value) in [
        ("weekly.acceptance_floor", config.weekly.acceptance_floor),
        ("weekly.low_confidence_threshold", config.weekly.low_confidence_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(anyhow::anyhow!("{} must be within [0, 1], got {}", name, value));
        }
    }

    if config.projection.lookback_weeks == 0 {
        return Err(anyhow::anyhow!("projection.lookback_weeks must be at least 1"));
    }

    if config.projection.games_per_week <= 0.0 {
        return Err(anyhow::anyhow!("projection.games_per_week must be positive"));
    }

    for week in &config.calendar.weeks {
        if week.days.len() != DAYS_PER_WEEK {
            return Err(anyhow::anyhow!(
                "Calendar week {} has {} days, expected {}",
                week.week_id,
                week.days.len(),
                DAYS_PER_WEEK
            ));
        }
    }

    Ok(())
}

/// Render the effective configuration as TOML
pub fn render_config(config: &TrackerConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to render configuration")
}
