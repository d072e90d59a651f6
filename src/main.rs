//! vacancydb CLI - load HeadHunter vacancies into SQLite and query them

use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use indicatif::HumanDuration;
use serde::Serialize;
use tabled::Tabled;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vacancydb::config::{self, VacancyConfig};
use vacancydb::menu::{self, Menu};
use vacancydb::pipeline::Checkpoints;
use vacancydb::storage::{JsonSaver, SchemaManager};
use vacancydb::ui::{self, Icons, LogWriter, Spinner, TableBuilder};
use vacancydb::{HeadHunterClient, Pipeline, QueryService};

#[derive(Parser)]
#[command(name = "vacancydb")]
#[command(version)]
#[command(about = "Load HeadHunter vacancies for a fixed set of employers into SQLite and query them")]
#[command(long_about = r#"
vacancydb downloads vacancy and employer listings from the HeadHunter API,
keeps them as JSON checkpoints, loads them into SQLite and answers:
  • vacancy count per company
  • all vacancies by salary
  • average salary and vacancies above it
  • keyword search over vacancy titles

Example usage:
  vacancydb init
  vacancydb run --force
  vacancydb query search --keyword developer
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Download vacancies and employers into the JSON checkpoints
    Fetch,

    /// Recreate the database from the JSON checkpoints
    Load {
        /// Drop the existing database
        #[arg(short, long)]
        force: bool,
    },

    /// Fetch, then recreate the database
    Reload {
        /// Drop the existing database
        #[arg(short, long)]
        force: bool,
    },

    /// Run one query against the loaded database
    Query {
        #[arg(value_enum)]
        kind: QueryKind,

        /// Keyword for `search`
        #[arg(short, long, required_if_eq("kind", "search"))]
        keyword: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Interactive query menu over the loaded database
    Menu,

    /// Reload, then open the interactive menu
    Run {
        /// Drop the existing database
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum QueryKind {
    /// Vacancy count per company
    Companies,
    /// All vacancies with company names, by salary
    Vacancies,
    /// Average salary
    Average,
    /// Vacancies paying above the average
    AboveAverage,
    /// Vacancies whose title contains the keyword
    Search,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(LogWriter))
        .with(filter)
        .init();

    // Init never reads the existing file, so --force can replace a broken one
    let result = match cli.command {
        Commands::Init { force } => run_init(cli.config, cli.database, force),
        command => load_settings(cli.config.as_deref(), cli.database).and_then(|cfg| dispatch(&cfg, command)),
    };

    if let Err(e) = result {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn load_settings(path: Option<&Path>, database: Option<PathBuf>) -> anyhow::Result<VacancyConfig> {
    let mut cfg = config::load_config(path)?;
    if let Some(database) = database {
        cfg.database = database;
    }
    Ok(cfg)
}

fn dispatch(cfg: &VacancyConfig, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init { .. } => Ok(()),
        Commands::Fetch => run_fetch(cfg),
        Commands::Load { force } => run_load(cfg, force, false),
        Commands::Reload { force } => run_load(cfg, force, true),
        Commands::Query { kind, keyword, format } => run_query(cfg, kind, keyword, format),
        Commands::Menu => run_menu(cfg),
        Commands::Run { force } => run_load(cfg, force, true).and_then(|_| run_menu(cfg)),
    }
}

fn run_init(path: Option<PathBuf>, database: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(config::default_config_path);
    config::init_config(&path, database, force)?;
    ui::success(&format!("Config written to {}", path.display()));
    Ok(())
}

fn checkpoints(cfg: &VacancyConfig) -> Checkpoints {
    Checkpoints::new(
        JsonSaver::new(&cfg.vacancies_file),
        JsonSaver::new(&cfg.employers_file),
    )
}

fn run_fetch(cfg: &VacancyConfig) -> anyhow::Result<()> {
    let client = HeadHunterClient::from_config(cfg)?;
    let schema = SchemaManager::new(&cfg.database);
    let pipeline = Pipeline::new(&client, &schema, checkpoints(cfg));

    ui::header("Fetching from HeadHunter");
    ui::info("API", &cfg.api_base_url);
    ui::info("Employers", &client.employer_ids().len().to_string());

    let start = Instant::now();
    let spinner = Spinner::new("Requesting vacancies and employers...");
    let summary = pipeline.fetch();
    spinner.finish_and_clear();
    let summary = summary?;

    ui::success("Checkpoints written");
    ui::summary_row("Vacancies:", &format!("{} → {}", summary.vacancies, cfg.vacancies_file.display()));
    ui::summary_row("Employers:", &format!("{} → {}", summary.employers, cfg.employers_file.display()));
    ui::timing(&HumanDuration(start.elapsed()).to_string());
    Ok(())
}

fn run_load(cfg: &VacancyConfig, force: bool, fetch_first: bool) -> anyhow::Result<()> {
    let schema = SchemaManager::new(&cfg.database);
    if schema.database_exists() && !force {
        anyhow::bail!(
            "database {} already exists; pass --force to drop and recreate it",
            cfg.database.display()
        );
    }

    if fetch_first {
        run_fetch(cfg)?;
    }

    if schema.database_exists() {
        ui::warn(&format!("Dropping existing database {}", cfg.database.display()));
    }

    ui::phase("Loading database");
    ui::info("Database", &format!("{} {}", Icons::DATABASE, cfg.database.display()));
    let start = Instant::now();
    let stats = checkpoints(cfg).load_into(&schema)?;

    let mut table = TableBuilder::new();
    table.add_row("Employers", &stats.employers.to_string());
    table.add_row("Vacancies", &stats.vacancies.to_string());
    println!("{}", table.build());
    ui::success("Data loaded");
    ui::timing(&HumanDuration(start.elapsed()).to_string());
    Ok(())
}

fn open_service(cfg: &VacancyConfig) -> anyhow::Result<QueryService> {
    if !cfg.database.exists() {
        anyhow::bail!(
            "database {} not found; run `vacancydb load` or `vacancydb reload` first",
            cfg.database.display()
        );
    }
    Ok(QueryService::open(&cfg.database)?)
}

fn run_query(
    cfg: &VacancyConfig,
    kind: QueryKind,
    keyword: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let service = open_service(cfg)?;

    match kind {
        QueryKind::Companies => emit(format, &service.companies_and_vacancies_count()?)?,
        QueryKind::Vacancies => emit(format, &service.all_vacancies()?)?,
        QueryKind::Average => {
            let avg = service.avg_salary()?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "average_salary": avg }))?)
                }
                OutputFormat::Table => println!("{} {}", Icons::MONEY, menu::format_average(avg)),
            }
        }
        QueryKind::AboveAverage => emit(format, &service.vacancies_with_higher_salary()?)?,
        QueryKind::Search => {
            let keyword = keyword.unwrap_or_default();
            if let OutputFormat::Table = format {
                ui::info("Keyword", &format!("{} {}", Icons::SEARCH, keyword));
            }
            emit(format, &service.vacancies_with_keyword(&keyword)?)?
        }
    }

    service.close()?;
    Ok(())
}

fn emit<T: Serialize + Tabled>(format: OutputFormat, rows: &[T]) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Table => println!("{}", ui::render_rows(rows)),
    }
    Ok(())
}

fn run_menu(cfg: &VacancyConfig) -> anyhow::Result<()> {
    let service = open_service(cfg)?;

    ui::section("Data ready. Choose an action:");
    let stdin = io::stdin();
    Menu::new(stdin.lock(), io::stdout()).run(service)?;
    Ok(())
}
