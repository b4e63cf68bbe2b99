use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use pact_core::report::{daily_report, export_daily_report};
use pact_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pact")]
#[command(about = "Daily commitment tracker for accountability groups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's progress (default)
    Status {
        /// Day to report on (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the point target for a day
    Target {
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Mode to compute for (sane, insane), defaults to the member's mode
        #[arg(long)]
        mode: Option<Mode>,
    },

    /// Score an exercise without logging it
    Score {
        exercise: String,
        quantity: f64,

        /// Weight used, for weighted exercises
        #[arg(long)]
        weight: Option<f64>,

        /// Decreased variant of the exercise
        #[arg(long)]
        decreased: bool,
    },

    /// Score an exercise and record it in the journal
    Log {
        exercise: String,
        quantity: f64,

        #[arg(long)]
        weight: Option<f64>,

        #[arg(long)]
        decreased: bool,

        /// Day to log for (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show current and longest streaks
    Streak {
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List available exercises
    Exercises,

    /// Export per-day summaries to CSV
    Export {
        path: PathBuf,

        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

/// Resolved locations and settings shared by every command
struct Workspace {
    config: Config,
    group: GroupConfig,
    journal_path: PathBuf,
    state_path: PathBuf,
}

impl Workspace {
    fn open(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let data_dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(|| config.data.data_dir.clone());
        let group = config.group_config()?;
        tracing::debug!("Using data dir {:?}, group {:?}", data_dir, group);

        Ok(Self {
            journal_path: data_dir.join("journal.jsonl"),
            state_path: data_dir.join("member.json"),
            config,
            group,
        })
    }

    fn context(&self, today: NaiveDate) -> Result<MemberContext> {
        let member = MemberState::load(&self.state_path)?;
        let history =
            journal::load_history(&self.journal_path, Some(self.group.start_date), Some(today))?;

        Ok(MemberContext {
            today,
            mode: member.mode,
            group: self.group.clone(),
            history,
        })
    }
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    pact_core::logging::init_with_level(if cli.verbose { "debug" } else { "warn" });

    let today = Local::now().date_naive();

    // score and exercises only need the catalog, not a configured group
    match cli.command.take() {
        Some(Commands::Status { date }) => {
            cmd_status(&Workspace::open(&cli)?, date.unwrap_or(today))
        }
        Some(Commands::Target { date, mode }) => {
            cmd_target(&Workspace::open(&cli)?, date.unwrap_or(today), mode)
        }
        Some(Commands::Score {
            exercise,
            quantity,
            weight,
            decreased,
        }) => cmd_score(&exercise, quantity, weight, decreased),
        Some(Commands::Log {
            exercise,
            quantity,
            weight,
            decreased,
            date,
        }) => cmd_log(
            &Workspace::open(&cli)?,
            &exercise,
            quantity,
            weight,
            decreased,
            date.unwrap_or(today),
        ),
        Some(Commands::Streak { date }) => {
            cmd_streak(&Workspace::open(&cli)?, date.unwrap_or(today))
        }
        Some(Commands::Exercises) => cmd_exercises(),
        Some(Commands::Export { path, from, to }) => {
            cmd_export(&Workspace::open(&cli)?, &path, from, to.unwrap_or(today))
        }
        None => cmd_status(&Workspace::open(&cli)?, today),
    }
}

fn load_catalog() -> Result<&'static Catalog> {
    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }
    Ok(catalog)
}

fn cmd_status(ws: &Workspace, date: NaiveDate) -> Result<()> {
    let ctx = ws.context(date)?;
    let status = daily_status(&ctx, &ws.config.targets)?;
    display_status(&status);
    Ok(())
}

fn cmd_target(ws: &Workspace, date: NaiveDate, mode: Option<Mode>) -> Result<()> {
    let mode = match mode {
        Some(mode) => mode,
        None => MemberState::load(&ws.state_path)?.mode,
    };
    let points = ws.group.target_on(date, mode, &ws.config.targets)?;
    let day_number = target::days_since_start(ws.group.start_date, date);
    let weekday = target::weekday_index(date);

    let note = if ws.group.is_rest_day(weekday) {
        " (rest day)"
    } else if ws.group.is_recovery_day(weekday) {
        " (recovery day)"
    } else {
        ""
    };

    println!(
        "Target for {} (day {}, {} mode): {} points{}",
        date, day_number, mode, points, note
    );
    Ok(())
}

fn cmd_score(exercise_id: &str, quantity: f64, weight: Option<f64>, decreased: bool) -> Result<()> {
    let catalog = load_catalog()?;
    let exercise = catalog.require(exercise_id)?;
    let points = score_entry(exercise, quantity, weight.unwrap_or(0.0), decreased);

    println!(
        "{} {} {}: {} points",
        quantity, exercise.unit, exercise.name, points
    );
    Ok(())
}

fn cmd_log(
    ws: &Workspace,
    exercise_id: &str,
    quantity: f64,
    weight: Option<f64>,
    decreased: bool,
    date: NaiveDate,
) -> Result<()> {
    let catalog = load_catalog()?;
    let exercise = catalog.require(exercise_id)?;
    let ctx = ws.context(date)?;

    let outcome = record_entry(
        &ctx,
        &ws.config.targets,
        exercise,
        quantity,
        weight.unwrap_or(0.0),
        decreased,
        Some(Utc::now()),
    )?;

    let mut sink = JsonlSink::new(&ws.journal_path);
    sink.append(&outcome.entry)?;

    println!(
        "✓ Logged {} {} {}: +{} points",
        quantity, exercise.unit, exercise.name, outcome.entry.computed_points
    );
    println!(
        "  Today: {}/{} ({} to go)",
        outcome.status.effective_total, outcome.status.target, outcome.status.remaining
    );

    if outcome.promoted {
        MemberState::update(&ws.state_path, |state| {
            state.promote(date);
            Ok(())
        })?;
        println!("★ Insane target reached! You are now in insane mode.");
    }

    Ok(())
}

fn cmd_streak(ws: &Workspace, date: NaiveDate) -> Result<()> {
    let ctx = ws.context(date)?;
    let summary = compute_insane_streak(&ctx.history, &ctx.group, date, &ws.config.targets)?;

    println!("Current streak: {} days", summary.current);
    println!("Longest streak: {} days", summary.longest);
    Ok(())
}

fn cmd_exercises() -> Result<()> {
    let catalog = load_catalog()?;

    for exercise in catalog.sorted() {
        let mut flags = Vec::new();
        if exercise.is_weighted {
            flags.push("weighted");
        }
        if exercise.supports_decreased_variant {
            flags.push("decreased");
        }

        println!(
            "  {:<16} {:<18} {:>4} pts/{:<5} {:?} {}",
            exercise.id,
            exercise.name,
            exercise.points_per_unit,
            exercise.unit,
            exercise.category,
            flags.join(",")
        );
    }
    Ok(())
}

fn cmd_export(ws: &Workspace, path: &Path, from: Option<NaiveDate>, to: NaiveDate) -> Result<()> {
    let from = from.unwrap_or(ws.group.start_date);
    let ctx = ws.context(to)?;

    let rows = daily_report(
        &ctx.history,
        &ctx.group,
        &ws.config.targets,
        ctx.mode,
        from,
        to,
    )?;
    let count = export_daily_report(&rows, path)?;

    println!("✓ Exported {} days to {}", count, path.display());
    Ok(())
}

fn display_status(status: &DailyStatus) {
    println!();
    println!("  Day {} ({}), {} mode", status.day_number, status.date, status.mode);
    println!();

    if status.is_rest_day {
        println!("  Rest day: no target today.");
    } else {
        if status.is_recovery_day {
            println!("  Recovery day: recovery points count in full.");
        }
        println!("  Target:    {}", status.target);
        println!(
            "  Earned:    {} (regular {}, recovery {} raw)",
            status.effective_total, status.regular_points, status.recovery_points_raw
        );
        println!("  Remaining: {}", status.remaining);
    }

    if status.target_met {
        println!();
        println!("  ✓ Target met");
    }

    if status.mode == Mode::Sane && !status.is_rest_day {
        println!("  Insane target: {}", status.insane_target);
    }

    println!();
}
