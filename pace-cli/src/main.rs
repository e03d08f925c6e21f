use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use pace_core::clock::{parse_date, today_in};
use pace_core::{CategoryKind, FinanceEngine, MonthConfig};
use pace_ledger::{JsonLedger, import_income_csv};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod report;
mod state;

use config::{Config, init_config, load_config};

#[derive(Parser, Debug)]
#[command(name = "pace", version, about = "Income pacing against a monthly budget")]
struct Cli {
    #[command(flatten)]
    globals: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Ledger file (default: from config, then ~/.pace/ledger.json)
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// User id inside the ledger (default: from config)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Evaluate as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default ~/.pace/config.toml
    Init,

    /// Month, day, category, savings and annual progress
    Report {
        /// Print the full report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Record income
    Income {
        #[command(subcommand)]
        command: IncomeCommand,
    },

    /// Configure the evaluated month
    Month {
        #[command(subcommand)]
        command: MonthCommand,
    },

    /// Manage budget categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// Manage saving goals
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },
}

#[derive(Subcommand, Debug)]
enum IncomeCommand {
    /// Add one income entry
    Add {
        amount: f64,
        /// Entry date (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Import `date,amount` rows from a CSV file
    Import { csv: PathBuf },
}

#[derive(Subcommand, Debug)]
enum MonthCommand {
    /// Set year, month and working days (clamped to 22..=30)
    Set {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        working_days: i64,
        #[arg(long)]
        annual_income_goal: Option<f64>,
        #[arg(long)]
        annual_savings_goal: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Add a fixed-amount or percentage-of-income category
    Add {
        name: String,
        #[command(flatten)]
        value: CategoryValue,
    },
    /// Replace a category's name, kind and value
    Edit {
        id: i64,
        name: String,
        #[command(flatten)]
        value: CategoryValue,
    },
    /// Remove a category by id
    Rm { id: i64 },
}

#[derive(Args, Debug)]
struct CategoryValue {
    /// Fixed monthly amount
    #[arg(long, conflicts_with = "percent", required_unless_present = "percent")]
    fixed: Option<f64>,
    /// Percentage of income
    #[arg(long)]
    percent: Option<f64>,
}

impl CategoryValue {
    fn kind_and_value(&self) -> Result<(CategoryKind, f64)> {
        match (self.fixed, self.percent) {
            (Some(amount), _) => Ok((CategoryKind::FixedAmount, amount)),
            (None, Some(p)) => Ok((CategoryKind::PercentageOfIncome, p)),
            (None, None) => bail!("pass --fixed <amount> or --percent <pct>"),
        }
    }
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    /// Add a saving goal (at most five per user)
    Add {
        name: String,
        target: f64,
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,
    },
    /// Remove a goal and its contributions
    Rm { id: i64 },
    /// Record a contribution toward a goal
    Contribute {
        id: i64,
        amount: f64,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Edit or remove recorded contributions
    Contribution {
        #[command(subcommand)]
        command: ContributionCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ContributionCommand {
    /// Change a contribution's date and amount
    Edit {
        id: i64,
        amount: f64,
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Remove a contribution by id
    Rm { id: i64 },
}

/// Settings resolved from flags over config
struct Session {
    ledger_path: PathBuf,
    user: String,
    today: NaiveDate,
    default_working_days: i64,
}

impl Session {
    fn resolve(args: &GlobalArgs, cfg: &Config) -> Result<Self> {
        let ledger_path = match args.ledger.clone().or_else(|| cfg.ledger.path.clone()) {
            Some(p) => p,
            None => state::default_ledger_path()?,
        };
        let user = args.user.clone().unwrap_or_else(|| cfg.ledger.user.clone());
        let today = match args.as_of {
            Some(d) => d,
            None => today_in(&cfg.calendar.timezone)?,
        };
        Ok(Self {
            ledger_path,
            user,
            today,
            default_working_days: cfg.calendar.default_working_days,
        })
    }

    fn open(&self) -> Result<JsonLedger> {
        JsonLedger::open(&self.ledger_path)
            .with_context(|| format!("open ledger {}", self.ledger_path.display()))
    }
}

fn init_logging(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config()?;
    init_logging(&cfg);

    match cli.command {
        Command::Init => init_config(),
        command => {
            let session = Session::resolve(&cli.globals, &cfg)?;
            info!(
                user = %session.user,
                today = %session.today,
                ledger = %session.ledger_path.display(),
                "resolved session"
            );
            run(command, &session)
        }
    }
}

fn run(command: Command, session: &Session) -> Result<()> {
    match command {
        Command::Init => init_config()?,

        Command::Report { json } => {
            let ledger = session.open()?;
            let report = FinanceEngine::new(&ledger)
                .with_default_working_days(session.default_working_days)
                .compute_financial_state(&session.user, session.today)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::render(&report)?);
            }
        }

        Command::Income { command } => {
            let mut ledger = session.open()?;
            match command {
                IncomeCommand::Add { amount, date } => {
                    let date = date.unwrap_or(session.today);
                    ledger.ledger_mut().add_income(&session.user, date, amount)?;
                    ledger.save()?;
                    println!("Recorded ${amount:.2} on {date}");
                }
                IncomeCommand::Import { csv } => {
                    if !csv.exists() {
                        bail!("CSV not found: {}", csv.display());
                    }
                    let summary = import_income_csv(ledger.ledger_mut(), &session.user, &csv)?;
                    ledger.save()?;
                    println!(
                        "Imported {} entries from {} ({} skipped)",
                        summary.imported,
                        csv.display(),
                        summary.skipped
                    );
                }
            }
        }

        Command::Month { command } => match command {
            MonthCommand::Set {
                year,
                month,
                working_days,
                annual_income_goal,
                annual_savings_goal,
            } => {
                let mut ledger = session.open()?;
                let mut config = MonthConfig::new(year, month, working_days);
                if let Some(goal) = annual_income_goal {
                    config = config.with_annual_income_goal(goal);
                }
                if let Some(goal) = annual_savings_goal {
                    config = config.with_annual_savings_goal(goal);
                }
                ledger.ledger_mut().set_month_config(&session.user, config);
                ledger.save()?;
                println!(
                    "Month set to {}-{:02} with {} working days",
                    config.year(),
                    config.month(),
                    config.working_days()
                );
            }
        },

        Command::Category { command } => {
            let mut ledger = session.open()?;
            match command {
                CategoryCommand::Add { name, value } => {
                    let (kind, value) = value.kind_and_value()?;
                    let id = ledger
                        .ledger_mut()
                        .add_category(&session.user, &name, kind, value)?;
                    ledger.save()?;
                    println!("Added category [{id}] {name}");
                }
                CategoryCommand::Edit { id, name, value } => {
                    let (kind, value) = value.kind_and_value()?;
                    ledger
                        .ledger_mut()
                        .update_category(&session.user, id, &name, kind, value)?;
                    ledger.save()?;
                    println!("Updated category [{id}] {name}");
                }
                CategoryCommand::Rm { id } => {
                    ledger.ledger_mut().remove_category(&session.user, id)?;
                    ledger.save()?;
                    println!("Removed category [{id}]");
                }
            }
        }

        Command::Goal { command } => {
            let mut ledger = session.open()?;
            match command {
                GoalCommand::Add {
                    name,
                    target,
                    start,
                    end,
                } => {
                    let id = ledger
                        .ledger_mut()
                        .add_saving_goal(&session.user, &name, target, start, end)?;
                    ledger.save()?;
                    println!("Added goal [{id}] {name}: ${target:.2} from {start} to {end}");
                }
                GoalCommand::Rm { id } => {
                    ledger.ledger_mut().remove_saving_goal(&session.user, id)?;
                    ledger.save()?;
                    println!("Removed goal [{id}] and its contributions");
                }
                GoalCommand::Contribute { id, amount, date } => {
                    let date = date.unwrap_or(session.today);
                    ledger
                        .ledger_mut()
                        .add_contribution(&session.user, id, date, amount)?;
                    ledger.save()?;
                    println!("Contributed ${amount:.2} to goal [{id}] on {date}");
                }
                GoalCommand::Contribution { command } => match command {
                    ContributionCommand::Edit { id, amount, date } => {
                        ledger
                            .ledger_mut()
                            .update_contribution(&session.user, id, date, amount)?;
                        ledger.save()?;
                        println!("Contribution [{id}] is now ${amount:.2} on {date}");
                    }
                    ContributionCommand::Rm { id } => {
                        ledger.ledger_mut().remove_contribution(&session.user, id)?;
                        ledger.save()?;
                        println!("Removed contribution [{id}]");
                    }
                },
            }
        }
    }

    Ok(())
}
