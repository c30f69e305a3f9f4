use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use work_calendar::bootstrap;
use work_calendar::config::Config;
use work_calendar::infrastructure::observability;
use work_calendar::infrastructure::persistence::Database;

#[derive(Parser, Debug)]
#[command(
    name = "work-calendar",
    about = "Working days, holidays and time off on the solar and lunar calendars",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply database migrations
    Migrate,
    /// Generate a civil year's holidays and store the missing ones
    SeedHolidays(SeedArgs),
    /// Print the day status of one user on one date
    Check(CheckArgs),
    /// Print the day status of one user for every date in a range
    Calendar(CalendarArgs),
    /// Print the generated holidays of a civil year without storing them
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct SeedArgs {
    #[arg(long)]
    year: i32,
    /// Leave out the weekly rest days
    #[arg(long)]
    no_weekly: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[arg(long)]
    user: String,
    /// Civil date, YYYY-MM-DD
    #[arg(long)]
    date: NaiveDate,
}

#[derive(Args, Debug)]
struct CalendarArgs {
    #[arg(long)]
    user: String,
    #[arg(long)]
    start: NaiveDate,
    #[arg(long)]
    end: NaiveDate,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long)]
    year: i32,
    /// Leave out the weekly rest days
    #[arg(long)]
    no_weekly: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init_tracing().map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing::debug!("Configuration loaded");

    let db = Database::connect(&config.database_url)
        .await
        .context("connecting to database")?;
    let services = bootstrap::build_services(&db, &config);

    match cli.command {
        Command::Migrate => {
            db.run_migrations().await?;
            tracing::info!("Database migrations applied");
        }
        Command::SeedHolidays(args) => {
            db.run_migrations().await?;
            let include_weekly = config.include_weekly_holidays && !args.no_weekly;
            let created = services
                .holidays
                .seed_year(&bootstrap::system_actor(&config), args.year, include_weekly)
                .await?;
            println!("{}", serde_json::json!({ "year": args.year, "created": created }));
        }
        Command::Check(args) => {
            let check = services.day_status.check_detailed(&args.user, args.date).await?;
            println!("{}", serde_json::to_string_pretty(&check)?);
        }
        Command::Calendar(args) => {
            let span = (args.end - args.start).num_days() + 1;
            if span > config.max_range_days {
                bail!(
                    "range of {} days exceeds MAX_RANGE_DAYS ({})",
                    span,
                    config.max_range_days
                );
            }
            let days = services
                .day_status
                .range(&args.user, args.start, args.end)
                .await?;
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
        Command::Generate(args) => {
            let include_weekly = config.include_weekly_holidays && !args.no_weekly;
            let holidays = services
                .holidays
                .generate_for_year_with(args.year, include_weekly)?;
            println!("{}", serde_json::to_string_pretty(&holidays)?);
        }
    }

    db.close().await;
    Ok(())
}
