mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use roster::{
    MemberSearchCondition, RosterService, SeaOrmMemberRepository, ServiceConfig,
};
use roster_db::DbHandle;
use roster_db::paging::PagingLimits;
use sea_orm_migration::MigratorTrait;
use serde::Serialize;

use crate::config::{AppConfig, CliOverrides};

/// Roster CLI - search, page and bulk-edit team members
#[derive(Parser)]
#[command(name = "roster-cli")]
#[command(about = "Roster CLI - search, page and bulk-edit team members")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database DSN override (overrides config)
    #[arg(long)]
    dsn: Option<String>,

    /// Save the demo roster before running the command
    #[arg(long)]
    seed: bool,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and exit
    Check,
    /// Apply pending schema migrations
    Migrate,
    /// Save the demo roster (two teams, five members)
    Seed,
    /// List every member matching the criteria
    Search(ConditionArgs),
    /// Count members matching the criteria
    Count(ConditionArgs),
    /// Fetch one page of matching members
    Page(PageArgs),
    /// Show a team and its members
    Team {
        /// Team id
        id: i64,
    },
    /// Move a member to another team
    MoveMember {
        #[arg(long)]
        member: i64,
        #[arg(long)]
        team: i64,
    },
    /// Add `delta` to the age of every matching member
    AddAge {
        #[arg(long, allow_hyphen_values = true)]
        delta: i32,
        #[command(flatten)]
        cond: ConditionArgs,
    },
    /// Delete every matching member
    Delete(ConditionArgs),
}

/// Member search criteria; omitted flags do not narrow the search.
#[derive(Args, Debug, Clone, Default)]
struct ConditionArgs {
    /// `LIKE` pattern for the member name, e.g. `member%`
    #[arg(long)]
    member_name: Option<String>,
    /// Exact team name
    #[arg(long)]
    team_name: Option<String>,
    /// Minimum age (inclusive)
    #[arg(long)]
    age_goe: Option<i32>,
    /// Maximum age (inclusive)
    #[arg(long)]
    age_loe: Option<i32>,
}

impl From<ConditionArgs> for MemberSearchCondition {
    fn from(args: ConditionArgs) -> Self {
        Self {
            member_name: args.member_name,
            team_name: args.team_name,
            age_goe: args.age_goe,
            age_loe: args.age_loe,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct PageArgs {
    /// 0-based page number
    #[arg(long, allow_hyphen_values = true)]
    page: Option<i64>,
    /// Page size (defaults to paging.default_page_size)
    #[arg(long, allow_hyphen_values = true)]
    size: Option<i64>,
    /// Sort keys, e.g. `-age,name`
    #[arg(long, allow_hyphen_values = true)]
    sort: Option<String>,
    /// Always read the total in the page query instead of inferring it
    #[arg(long)]
    eager: bool,
    #[command(flatten)]
    cond: ConditionArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML (if provided) -> 3) env (ROSTER__*) -> 4) CLI overrides
    let mut config = AppConfig::load_layered(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        dsn: cli.dsn.clone(),
        verbose: cli.verbose,
    });

    logging::init_logging(&config.logging)?;

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    config.validate()?;

    match cli.command {
        None | Some(Commands::Check) => check_config(&config),
        Some(command) => run_command(&config, cli.seed, command).await,
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Connect, bring the schema up to date and build the service.
async fn open(config: &AppConfig) -> Result<(DbHandle, RosterService, usize)> {
    let db = config
        .database
        .connect()
        .await
        .context("failed to connect to database")?;

    let pending = roster::Migrator::get_pending_migrations(db.conn())
        .await?
        .len();
    roster::Migrator::up(db.conn(), None)
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied = pending, "schema is up to date");

    let repo = SeaOrmMemberRepository::new(db.conn().clone()).with_limits(PagingLimits {
        max_page_size: config.paging.max_page_size,
    });
    let svc = RosterService::new(Arc::new(repo), ServiceConfig::from(&config.paging));
    Ok((db, svc, pending))
}

async fn run_command(config: &AppConfig, seed: bool, command: Commands) -> Result<()> {
    let (db, svc, pending) = open(config).await?;

    if seed && !matches!(command, Commands::Seed) {
        svc.seed_demo().await?;
    }

    let result = dispatch(&svc, pending, command).await;
    db.close().await?;
    result
}

async fn dispatch(svc: &RosterService, pending: usize, command: Commands) -> Result<()> {
    match command {
        Commands::Check => Ok(()),
        Commands::Migrate => print_json(&serde_json::json!({ "applied": pending })),
        Commands::Seed => {
            let saved = svc.seed_demo().await?;
            print_json(&serde_json::json!({
                "teams": saved.teams.iter().map(|(_, id)| id).collect::<Vec<_>>(),
                "members": saved.members.iter().map(|(_, id)| id).collect::<Vec<_>>(),
            }))
        }
        Commands::Search(cond) => print_json(&svc.search(&cond.into()).await?),
        Commands::Count(cond) => {
            print_json(&serde_json::json!({ "count": svc.count(&cond.into()).await? }))
        }
        Commands::Page(args) => {
            let req = svc.page_request(args.page, args.size, args.sort.as_deref())?;
            let cond = args.cond.into();
            let page = if args.eager {
                svc.paging_search(&cond, &req).await?
            } else {
                svc.paging_search_optimized(&cond, &req).await?
            };
            print_json(&page)
        }
        Commands::Team { id } => print_json(&svc.get_team(id).await?),
        Commands::MoveMember { member, team } => print_json(&svc.change_team(member, team).await?),
        Commands::AddAge { delta, cond } => {
            let affected = svc.bulk_add_age(&cond.into(), delta).await?;
            print_json(&serde_json::json!({ "affected": affected }))
        }
        Commands::Delete(cond) => {
            let affected = svc.bulk_delete(&cond.into()).await?;
            print_json(&serde_json::json!({ "affected": affected }))
        }
    }
}
