// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

/**
 * Fortress Console - Command Line Interface
 * Operations console for the Fortress scanning platform
 *
 * @copyright 2025 Fortress Labs
 * @license Proprietary
 */

pub mod account;
pub mod logs;
pub mod scan;
pub mod settings;
pub mod stats;
pub mod threats;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::{ApiClient, ExportFormat};
use crate::config::ConsoleConfig;
use crate::errors::ApiError;
use crate::session::SessionStore;
use crate::types::{RiskLevel, ScanKind, ThreatKind};

/// Fortress - Security Operations Console
#[derive(Parser)]
#[command(name = "fortress")]
#[command(author = "Fortress Labs <ops@fortresslabs.io>")]
#[command(version)]
#[command(about = "Trigger scans, watch progress and review findings from your terminal.", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend root URL (overrides config file)
    #[arg(long, global = true, env = "FORTRESS_BACKEND_URL")]
    pub backend_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "FORTRESS_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create a new operator account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "FORTRESS_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Reset an account password
    ResetPassword {
        #[arg(short, long)]
        username: String,

        #[arg(long)]
        new_password: String,
    },

    /// Clear the stored session
    Logout,

    /// Trigger a scan and follow its progress
    Scan {
        /// Target URL to scan
        target: String,

        /// Scan engine: xss or sql
        #[arg(short, long, value_enum, default_value = "xss")]
        kind: ScanKindArg,

        /// Print the scan id and return without polling
        #[arg(long)]
        no_follow: bool,
    },

    /// Check the status of a scan by id
    Status {
        scan_id: String,

        #[arg(short, long, value_enum, default_value = "xss")]
        kind: ScanKindArg,
    },

    /// Browse XSS scan logs
    Logs {
        #[command(subcommand)]
        action: Option<LogsAction>,

        /// Substring match over URL, alert name and description
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by risk level
        #[arg(short, long, value_enum)]
        risk: Option<RiskArg>,

        /// Filter by date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Page to show
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page
        #[arg(long)]
        page_size: Option<usize>,

        /// Keep the table on screen and refresh it periodically
        #[arg(short, long)]
        watch: bool,
    },

    /// Browse SQL injection findings
    SqlLogs {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long, value_enum)]
        risk: Option<RiskArg>,

        #[arg(long)]
        date: Option<String>,

        #[arg(short, long, default_value = "1")]
        page: usize,

        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show aggregated scan statistics
    Stats {
        /// Emit raw JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Inspect or change the backend scanner configuration
    Config {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Browse or record threat logs
    Threats {
        #[command(subcommand)]
        action: Option<ThreatsAction>,

        /// Substring match over description and source IP
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by threat type
        #[arg(long = "type", value_enum)]
        kind: Option<ThreatKindArg>,

        #[arg(long)]
        date: Option<String>,

        #[arg(short, long, default_value = "1")]
        page: usize,
    },
}

#[derive(Subcommand)]
pub enum LogsAction {
    /// Show the full detail of one finding
    Show { id: u64 },

    /// Delete a scan log
    Delete { id: u64 },

    /// Download the server-side log export
    Export {
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormatArg,

        /// Output file (defaults to logs.csv / logs.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the current scanner configuration
    Show,

    /// Update scanner configuration fields
    Set {
        #[arg(long)]
        scan_depth: Option<u32>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u32>,

        /// Comma-separated URL exclusion patterns
        #[arg(long)]
        exclude_urls: Option<String>,

        #[arg(long)]
        alerts: Option<bool>,

        #[arg(long)]
        toast: Option<bool>,

        #[arg(long)]
        email: Option<bool>,
    },

    /// Reset the scanner configuration to defaults
    Reset,
}

#[derive(Subcommand)]
pub enum ThreatsAction {
    /// Record a new threat log entry
    Add {
        #[arg(long = "type", value_enum)]
        kind: ThreatKindArg,

        #[arg(long)]
        source_ip: String,

        #[arg(long)]
        description: String,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ScanKindArg {
    Xss,
    Sql,
}

impl From<ScanKindArg> for ScanKind {
    fn from(arg: ScanKindArg) -> Self {
        match arg {
            ScanKindArg::Xss => ScanKind::Xss,
            ScanKindArg::Sql => ScanKind::Sql,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum RiskArg {
    High,
    Medium,
    Low,
}

impl From<RiskArg> for RiskLevel {
    fn from(arg: RiskArg) -> Self {
        match arg {
            RiskArg::High => RiskLevel::High,
            RiskArg::Medium => RiskLevel::Medium,
            RiskArg::Low => RiskLevel::Low,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ThreatKindArg {
    Xss,
    BruteForce,
    Other,
}

impl From<ThreatKindArg> for ThreatKind {
    fn from(arg: ThreatKindArg) -> Self {
        match arg {
            ThreatKindArg::Xss => ThreatKind::Xss,
            ThreatKindArg::BruteForce => ThreatKind::BruteForce,
            ThreatKindArg::Other => ThreatKind::Other,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Json,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Json => ExportFormat::Json,
        }
    }
}

/// Everything a command handler needs: resolved configuration and the
/// session store
pub struct AppContext {
    pub config: ConsoleConfig,
    pub sessions: SessionStore,
}

impl AppContext {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = ConsoleConfig::load(cli.config.as_deref())?;
        if let Some(url) = &cli.backend_url {
            config.backend_url = url.clone();
        }
        Ok(Self {
            config,
            sessions: SessionStore::open_default(),
        })
    }

    /// Authenticated API client - this is the auth guard for every
    /// non-public command
    pub fn client(&self) -> Result<ApiClient> {
        let session = self.sessions.require()?;
        let mut client = ApiClient::new(&self.config, Some(session.access))?;
        if self.config.cache_enabled {
            client = client.with_cache(64, self.config.cache_ttl_secs);
        }
        Ok(client)
    }
}

/// Add a re-login hint when the backend rejected our token
pub(crate) fn describe_api_error(err: ApiError) -> anyhow::Error {
    if err.status() == Some(401) {
        anyhow!("{} (session may have expired - run `fortress login`)", err)
    } else {
        anyhow!(err)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::from_cli(&cli)?;

    match cli.command {
        Commands::Login { username, password } => account::login(&ctx, &username, &password).await,
        Commands::Register { username, password } => {
            account::register(&ctx, &username, &password).await
        }
        Commands::ResetPassword {
            username,
            new_password,
        } => account::reset_password(&ctx, &username, &new_password).await,
        Commands::Logout => account::logout(&ctx),
        Commands::Scan {
            target,
            kind,
            no_follow,
        } => scan::run_scan(&ctx, &target, kind.into(), no_follow).await,
        Commands::Status { scan_id, kind } => scan::show_status(&ctx, &scan_id, kind.into()).await,
        Commands::Logs {
            action: Some(action),
            ..
        } => match action {
            LogsAction::Show { id } => logs::show(&ctx, id).await,
            LogsAction::Delete { id } => logs::delete(&ctx, id).await,
            LogsAction::Export { format, output } => {
                logs::export(&ctx, format.into(), output).await
            }
        },
        Commands::Logs {
            action: None,
            search,
            risk,
            date,
            page,
            page_size,
            watch,
        } => {
            logs::list(
                &ctx,
                search,
                risk.map(Into::into),
                date,
                page,
                page_size,
                watch,
            )
            .await
        }
        Commands::SqlLogs {
            search,
            risk,
            date,
            page,
            page_size,
        } => logs::list_sql(&ctx, search, risk.map(Into::into), date, page, page_size).await,
        Commands::Stats { json } => stats::show(&ctx, json).await,
        Commands::Config { action } => match action {
            SettingsAction::Show => settings::show(&ctx).await,
            SettingsAction::Set {
                scan_depth,
                timeout,
                exclude_urls,
                alerts,
                toast,
                email,
            } => {
                settings::set(
                    &ctx,
                    scan_depth,
                    timeout,
                    exclude_urls,
                    alerts,
                    toast,
                    email,
                )
                .await
            }
            SettingsAction::Reset => settings::reset(&ctx).await,
        },
        Commands::Threats {
            action: Some(ThreatsAction::Add {
                kind,
                source_ip,
                description,
            }),
            ..
        } => threats::add(&ctx, kind.into(), source_ip, description).await,
        Commands::Threats {
            action: None,
            search,
            kind,
            date,
            page,
        } => threats::list(&ctx, search, kind.map(Into::into), date, page).await,
    }
}
