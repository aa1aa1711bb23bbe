//! # Command Line Interface
//!
//! Every command prints a pretty JSON document on stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use league_core::{PlatformPlayerId, TeamId, WeekId};
use projection_engine::PlayerQuery;

use crate::config::render_config;
use crate::service::TrackerService;

/// Fantasy baseball league tracker
#[derive(Debug, Parser)]
#[command(name = "league-tracker")]
#[command(about = "Weekly totals and projections for a fantasy baseball league")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// One team's totals for a league week
    Week {
        #[arg(long)]
        team: TeamId,
        #[arg(long)]
        week: WeekId,
    },
    /// Totals for several teams (defaults to the configured teams)
    League {
        #[arg(long)]
        week: WeekId,
        #[arg(long, value_delimiter = ',')]
        teams: Vec<TeamId>,
    },
    /// Median projection of a team's prior weeks
    ProjectTeam {
        #[arg(long)]
        team: TeamId,
        #[arg(long)]
        week: WeekId,
    },
    /// Full-week projection of one player from prior weeks
    ProjectPlayer {
        /// Player name as the fantasy platform shows it
        name: String,
        #[arg(long)]
        week: WeekId,
        /// Pro team code
        #[arg(long, default_value = "")]
        team: String,
        /// Primary position code
        #[arg(long, default_value = "")]
        position: String,
        /// Fantasy platform player id (enables manual overrides)
        #[arg(long)]
        platform_id: Option<PlatformPlayerId>,
    },
    /// Cache counters, optionally after loading a league week
    CacheStats {
        #[arg(long)]
        week: Option<WeekId>,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// CLI handler
pub struct CliHandler {
    service: TrackerService,
}

impl CliHandler {
    pub fn new(service: TrackerService) -> Self {
        Self { service }
    }

    /// Run a command and return its report
    pub async fn handle_command(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Week { team, week } => {
                let stat = self.service.week(team, week).await?;
                to_json(stat.as_ref())
            }
            Commands::League { week, teams } => to_json(&self.service.league(&teams, week).await),
            Commands::ProjectTeam { team, week } => to_json(&self.service.project_team(team, week).await),
            Commands::ProjectPlayer { name, week, team, position, platform_id } => {
                let query = PlayerQuery { platform_id, name, team, position };
                to_json(&self.service.project_player(query, week).await?)
            }
            Commands::CacheStats { week } => {
                if let Some(week) = week {
                    self.service.league(&[], week).await;
                }
                to_json(&self.service.cache_report())
            }
            Commands::Config => render_config(self.service.config()),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize report")
}
