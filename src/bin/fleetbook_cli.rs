use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use fleetbook_api::{
    config::{self, AppConfig},
    db::{self, DbPool},
    ledger::{MonthlyReport, SegmentSummary},
    logging::{self, LoggerConfig},
    reports::{render_monthly_html, ReportBranding},
    services::reports::ReportService,
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize().await?;

    match cli.command {
        Commands::Report(args) => handle_report_command(&context, args, cli.json).await?,
        Commands::Migrate => handle_migrate_command(&context).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(name = "fleetbook", about = "Fleetbook back-office CLI", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the monthly profit report
    Report(ReportArgs),
    /// Apply pending database migrations
    Migrate,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(long, help = "Month name, e.g. January")]
    month: String,
    #[arg(long, help = "Four digit year")]
    year: i32,
    #[arg(long, value_parser = clap::value_parser!(Uuid), help = "Owning user identifier (UUID)")]
    user: Uuid,
    #[arg(long, action = ArgAction::SetTrue, help = "Render the report as an HTML document")]
    html: bool,
    #[arg(long, help = "Write the output to this file instead of stdout")]
    out: Option<PathBuf>,
}

struct CliContext {
    config: AppConfig,
    db: Arc<DbPool>,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(&config.log_level, config.log_json);

        let db_pool = db::establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to database")?;
        debug!(target: "fleetbook_cli", "database connection established");

        Ok(Self {
            config,
            db: Arc::new(db_pool),
        })
    }

    fn report_service(&self) -> ReportService {
        let root = logging::setup_logger(LoggerConfig::plain());
        ReportService::new(self.db.clone(), logging::component_logger(&root, "cli"))
    }
}

async fn handle_report_command(context: &CliContext, args: ReportArgs, json: bool) -> Result<()> {
    let report = context
        .report_service()
        .monthly_report(args.user, &args.month, args.year)
        .await
        .with_context(|| format!("failed to build report for {} {}", args.month, args.year))?;

    let output = if args.html {
        let branding = ReportBranding::new(
            context.config.company_name.clone(),
            context.config.currency_symbol.clone(),
        );
        render_monthly_html(&report, &branding)
    } else if json {
        to_pretty_json(&report)?
    } else {
        render_report_text(&report, &context.config.currency_symbol)
    };

    match args.out {
        Some(path) => {
            fs::write(&path, output)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{}", output),
    }

    Ok(())
}

async fn handle_migrate_command(context: &CliContext) -> Result<()> {
    db::run_migrations(&context.db)
        .await
        .context("failed to run migrations")?;
    println!("Migrations applied");
    Ok(())
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn render_report_text(report: &MonthlyReport, currency: &str) -> String {
    let mut lines = vec![format!("Monthly report • {} {}", report.month, report.year)];
    lines.extend(render_segment("Own trucks", &report.own, currency));
    lines.extend(render_segment("Market trucks", &report.market, currency));
    lines.push(format!(
        "Expenses • trip {}{} • office {}{}",
        currency, report.expenses.total_expense, currency, report.expenses.total_office_expense
    ));
    lines.push(format!(
        "Profit • own {}{} • market {}{} • total {}{}",
        currency, report.own_profit, currency, report.market_profit, currency, report.total_profit
    ));
    lines.join("\n")
}

fn render_segment(label: &str, segment: &SegmentSummary, currency: &str) -> Vec<String> {
    let mut lines = vec![format!(
        "{} • {} trips • freight {}{} • charges {}{} • deductions {}{}",
        label,
        segment.trip_count,
        currency,
        segment.total_freight,
        currency,
        segment.total_charges,
        currency,
        segment.total_deductions
    )];
    for trip in &segment.trips {
        lines.push(format!(
            "- {} • {} • {} • {}{}",
            trip.trip_id,
            trip.start_date.format("%Y-%m-%d"),
            trip.truck_no.as_deref().unwrap_or("-"),
            currency,
            trip.amount
        ));
    }
    lines
}
