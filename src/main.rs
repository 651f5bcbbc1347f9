mod api;
mod app;
mod config;
mod domain;
mod files;
mod input;
mod logging;
mod notifications;
mod report;
mod store;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use api::{ApiWorker, HttpApi, TaskApi};
use app::AppState;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use config::{Config, API_URL_ENV};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{format_date, Category, FilterConfig, Priority, RecurringFilter, StatusFilter, Task};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "A terminal client for the task planner backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config and PLANNER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Less log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,
    /// Print the task list, filtered
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print a markdown statistics report over the filtered tasks
    Stats {
        #[command(flatten)]
        filter: FilterArgs,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the available task templates
    Templates,
    /// Download the task export
    Export {
        /// Output file. Defaults to the download directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Filter flags shared by `list` and `stats`
#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// All, Pending or Completed
    #[arg(long, default_value = "All")]
    status: StatusFilter,
    #[arg(long)]
    priority: Option<Priority>,
    #[arg(long)]
    category: Option<Category>,
    /// All, Recurring or One-time
    #[arg(long, default_value = "All")]
    recurring: RecurringFilter,
    /// Free-text search over title, description, category and tags
    #[arg(long)]
    search: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> FilterConfig {
        FilterConfig {
            status: self.status,
            priority: self.priority,
            category: self.category,
            recurring: self.recurring,
            search: self.search.clone().unwrap_or_default(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = files::config_file()?;

    match cli.command {
        None => run_tui(&cli, config_path),
        Some(ref command) => {
            logging::init_stderr(cli.verbose, cli.quiet)?;
            if let Commands::Init = command {
                config::init_config(&config_path)?;
                println!("Wrote default config: {}", config_path.display());
                return Ok(());
            }
            let config = load_config(&cli, &config_path)?;
            let api = HttpApi::new(&config.api_url, config.request_timeout())?;
            run_command(command, &config, &api)
        }
    }
}

fn load_config(cli: &Cli, path: &Path) -> Result<Config> {
    let config = Config::load(path)?.with_overrides(cli.api_url.clone(), std::env::var(API_URL_ENV).ok());
    info!(api_url = %config.api_url, "configuration loaded");
    Ok(config)
}

fn run_command(command: &Commands, config: &Config, api: &dyn TaskApi) -> Result<()> {
    match command {
        Commands::Init => Ok(()),
        Commands::List { filter } => {
            let filter = filter.to_filter();
            let tasks = api.list_tasks().context("Failed to load tasks")?;
            let shown = filter.apply(&tasks);
            for task in &shown {
                println!("{}", list_line(task));
            }
            match filter.search_summary(shown.len()) {
                Some(summary) => println!("{}", summary),
                None => println!("{} of {} tasks", shown.len(), tasks.len()),
            }
            Ok(())
        }
        Commands::Stats { filter, output } => {
            let tasks = api.list_tasks().context("Failed to load tasks")?;
            let report = report::render_report(&tasks, &filter.to_filter(), Local::now().date_naive());
            match output {
                Some(path) => {
                    report::write_report(path, &report)?;
                    println!("Report written: {}", path.display());
                }
                None => print!("{}", report),
            }
            Ok(())
        }
        Commands::Templates => {
            let templates = api.list_templates().context("Failed to load templates")?;
            if templates.is_empty() {
                println!("No templates available");
            }
            for t in templates {
                println!("{}  {} ({}, {})", t.id, t.name, t.category, t.priority);
            }
            Ok(())
        }
        Commands::Export { output } => {
            let export = api.export_tasks().context("Failed to export tasks")?;
            let path = match output {
                Some(path) => path.clone(),
                None => {
                    let dir = download_dir(config)?;
                    files::ensure_dir(&dir)?;
                    let name = export.filename.as_deref().unwrap_or(app::DEFAULT_EXPORT_NAME);
                    files::unique_path(&dir, name)
                }
            };
            files::atomic_write(&path, &export.bytes)?;
            println!("Exported to {}", path.display());
            Ok(())
        }
    }
}

/// One task per line for `planner list`
fn list_line(task: &Task) -> String {
    let mut line = format!(
        "[{}] {}  ({}, {})",
        if task.completed { "x" } else { " " },
        task.title,
        task.priority,
        task.category
    );
    if let Some(label) = task.recurrence_label() {
        line.push_str(&format!("  ↻ {}", label));
    }
    if let Some(date) = task.due_date {
        line.push_str(&format!("  due {}", format_date(date)));
    }
    line
}

fn download_dir(config: &Config) -> Result<PathBuf> {
    match &config.download_dir {
        Some(dir) => Ok(dir.clone()),
        None => files::default_download_dir(),
    }
}

fn run_tui(cli: &Cli, config_path: PathBuf) -> Result<()> {
    // Held until exit so buffered log lines are flushed
    let _log_guard = logging::init_file(cli.verbose)?;

    let config = load_config(cli, &config_path)?;
    let api = HttpApi::new(&config.api_url, config.request_timeout())?;
    let worker = ApiWorker::spawn(api).context("Failed to start API worker")?;
    let export_dir = download_dir(&config)?;

    let mut app = AppState::new(config, Some(config_path), export_dir, Box::new(worker));
    app.refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "ui loop failed");
        eprintln!("Error: {}", err);
    }
    info!("planner exiting");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        app.poll_replies();
        app.tick(Local::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::fixtures::task;
    use crate::domain::enums::RecurrenceType;
    use chrono::NaiveDate;

    #[test]
    fn test_cli_parses_list_filters() {
        let cli = Cli::try_parse_from([
            "planner", "-v", "list", "--status", "Pending", "--priority", "High", "--search", "gym",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Some(Commands::List { filter }) => {
                assert_eq!(filter.status, StatusFilter::Pending);
                assert_eq!(filter.priority, Some(Priority::High));
                assert_eq!(filter.search.as_deref(), Some("gym"));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_cli_parses_stats_filters() {
        let cli = Cli::try_parse_from([
            "planner", "stats", "--category", "Work", "--recurring", "one-time", "-o", "report.md",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Stats { filter, output }) => {
                let filter = filter.to_filter();
                assert_eq!(filter.category, Some(Category::Work));
                assert_eq!(filter.recurring, RecurringFilter::OneTime);
                assert_eq!(filter.status, StatusFilter::All);
                assert!(filter.search.is_empty());
                assert_eq!(output, Some(PathBuf::from("report.md")));
            }
            _ => panic!("expected stats"),
        }
    }

    #[test]
    fn test_stats_without_flags_reports_everything() {
        let cli = Cli::try_parse_from(["planner", "stats"]).unwrap();
        match cli.command {
            Some(Commands::Stats { filter, output }) => {
                assert!(!filter.to_filter().is_active());
                assert!(output.is_none());
            }
            _ => panic!("expected stats"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_priority() {
        assert!(Cli::try_parse_from(["planner", "list", "--priority", "Urgent"]).is_err());
    }

    #[test]
    fn test_list_line() {
        let mut t = task("t1", "Gym");
        t.is_recurring = true;
        t.recurrence_type = RecurrenceType::Daily;
        t.due_date = NaiveDate::from_ymd_opt(2025, 1, 5);
        assert_eq!(list_line(&t), "[ ] Gym  (Medium, General)  ↻ Daily  due Jan 05, 2025");
    }
}
