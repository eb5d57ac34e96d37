//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open (or create) a TaskNest database and seed defaults on first run.
//! - Print categories in default order with their active task counts.

use clap::Parser;
use log::error;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tasknest_core::db::open_db;
use tasknest_core::{
    init_logging_from_config, seed_defaults_if_empty, BundledLocalizer, CategoryService,
    CoreConfig, SqliteCategoryRepository, SqliteTaskRepository,
};

#[derive(Debug, Parser)]
#[command(name = "tasknest", version, about = "Inspect a TaskNest database", long_about = None)]
struct Cli {
    /// SQLite database file; created and seeded when missing.
    #[arg(default_value = "tasknest.db")]
    db_path: PathBuf,

    /// JSON `CoreConfig` document.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files; overrides the config value.
    #[arg(long, env = "TASKNEST_LOG_DIR")]
    log_dir: Option<String>,
}

impl Cli {
    fn core_config(&self) -> Result<CoreConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => CoreConfig::from_json_str(&std::fs::read_to_string(path)?)?,
            None => CoreConfig::default(),
        };
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = Some(log_dir.clone());
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("tasknest: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.core_config()?;
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("tasknest: logging disabled: {err}");
    }

    let mut conn = open_db(&cli.db_path)?;
    let localizer = BundledLocalizer::new();
    if seed_defaults_if_empty(&mut conn, &localizer)?.is_some() {
        println!("seeded default categories into {}", cli.db_path.display());
    }

    let service = CategoryService::new(
        SqliteCategoryRepository::new(&conn),
        SqliteTaskRepository::new(&conn),
    );
    for category in service.list_categories(&[])? {
        let active = service.active_tasks(category.id())?;
        println!(
            "{:>3}  #{}  {}  ({} active)",
            category.order(),
            category.color_value().to_hex(),
            category.name(),
            active.len()
        );
    }
    println!("tasknest_core version={}", tasknest_core::core_version());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn db_path_defaults_and_positional_override() {
        let cli = Cli::try_parse_from(["tasknest"]).unwrap();
        assert_eq!(cli.db_path, PathBuf::from("tasknest.db"));

        let cli = Cli::try_parse_from(["tasknest", "/tmp/nest.db"]).unwrap();
        assert_eq!(cli.db_path, PathBuf::from("/tmp/nest.db"));
    }

    #[test]
    fn log_dir_flag_overrides_config_value() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("tasknest.json");
        std::fs::write(
            &config_path,
            r#"{"log_level": "WARN", "log_dir": "/var/log/from-config"}"#,
        )
        .unwrap();
        let config_arg = config_path.to_str().unwrap();

        let cli = Cli::try_parse_from(["tasknest", "--config", config_arg]).unwrap();
        let config = cli.core_config().unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/from-config"));

        let cli = Cli::try_parse_from([
            "tasknest",
            "--config",
            config_arg,
            "--log-dir",
            "/var/log/tasknest",
        ])
        .unwrap();
        let config = cli.core_config().unwrap();
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/tasknest"));
    }

    #[test]
    fn malformed_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("broken.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        let cli = Cli::try_parse_from(["tasknest", "--config", config_path.to_str().unwrap()])
            .unwrap();
        let err = cli.core_config().unwrap_err();
        assert!(err.to_string().contains("invalid config document"));
    }
}
