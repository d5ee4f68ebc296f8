pub mod config;
pub mod db {
    pub mod models;
}
pub mod monitoring {
    pub mod adherence;
    pub mod alerts;
    pub mod glycemic;
}
pub mod report;
pub mod schema;
pub mod store;
pub mod utils;

use crate::config::Config;
use crate::monitoring::{adherence, glycemic};
use crate::store::pg::PgStore;
use chrono::Utc;
use diesel::PgConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{error, info};
use std::path::PathBuf;

#[derive(Debug)]
struct LoadedEnvFile {
    path: PathBuf,
    explicit: bool,
}

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn apply_database_migrations(conn: &mut PgConnection) -> Result<(), String> {
    match conn.run_pending_migrations(MIGRATIONS) {
        Ok(applied) => {
            if applied.is_empty() {
                info!("Database schema is up to date; no migrations were applied");
            } else {
                let names = applied.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
                info!("Applied {} database migration(s): {}", applied.len(), names);
            }
            Ok(())
        }
        Err(e) => Err(format!("Applying database migrations failed: {}", e)),
    }
}

pub fn run() -> Result<(), String> {
    // 1) Load config
    let cfg = Config::from_env()?;
    info!(
        "Config loaded (target_day={}, glycemic_checks={}, adherence_checks={}, report={})",
        cfg.target_day.map(|d| d.to_string()).unwrap_or_else(|| "today".to_string()),
        cfg.glycemic_checks_enabled,
        cfg.adherence_checks_enabled,
        cfg.report_enabled
    );

    // 2) Connect DB
    let mut conn = PgConnection::establish(&cfg.database_url).map_err(|e| format!("DB connection failed: {}", e))?;
    info!("Connected to database");

    // 3) Apply pending database migrations
    apply_database_migrations(&mut conn)?;

    // 4) Resolve the evaluated day
    let target_day = cfg.target_day.unwrap_or_else(|| Utc::now().date_naive());
    info!("Running monitoring checks for {}", target_day);

    // 5) Rule groups
    let mut glycemic_created = 0;
    let mut adherence_created = 0;
    {
        let mut store = PgStore::new(&mut conn);

        if cfg.glycemic_checks_enabled {
            glycemic_created = glycemic::run_all(&mut store, target_day)?;
            info!("Glycemic checks complete ({} alert(s) created)", glycemic_created);
        } else {
            info!(
                "Glycemic checks disabled via GLYCEMIC_CHECKS_ENABLED={}",
                cfg.glycemic_checks_enabled
            );
        }

        if cfg.adherence_checks_enabled {
            adherence_created = adherence::run_all(&mut store, target_day)?;
            info!("Adherence check complete ({} alert(s) created)", adherence_created);
        } else {
            info!(
                "Adherence check disabled via ADHERENCE_CHECKS_ENABLED={}",
                cfg.adherence_checks_enabled
            );
        }
    }

    // 6) Summary of today's alerts. Alerts are stamped with the wall-clock
    // day, which is what the report covers even when TARGET_DAY points at
    // the past.
    if cfg.report_enabled {
        report::print_daily_summary(&mut conn, Utc::now().date_naive())?;
    }

    info!(
        "Monitoring run complete (glycemic: {} alert(s), adherence: {} alert(s))",
        glycemic_created, adherence_created
    );
    Ok(())
}

fn configure_env_from_cli() -> Result<Option<LoadedEnvFile>, String> {
    let mut args = std::env::args_os();
    args.next(); // skip program name

    let mut env_file: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some("--env-file") => {
                if env_file.is_some() {
                    return Err("`--env-file` provided more than once".to_string());
                }
                let value = args
                    .next()
                    .ok_or_else(|| "`--env-file` requires a path argument".to_string())?;
                env_file = Some(PathBuf::from(value));
            }
            Some(s) if s.starts_with("--env-file=") => {
                if env_file.is_some() {
                    return Err("`--env-file` provided more than once".to_string());
                }
                let path_str = &s["--env-file=".len()..];
                if path_str.is_empty() {
                    return Err("`--env-file` requires a path argument".to_string());
                }
                env_file = Some(PathBuf::from(path_str));
            }
            Some("--") => break,
            Some(other) => return Err(format!("unrecognised argument: {}", other)),
            None => return Err("argument contains invalid UTF-8".to_string()),
        }
    }

    // Values already present in the process environment win over the file.
    if let Some(path) = env_file {
        dotenvy::from_path(&path).map_err(|e| format!("failed to load env file {}: {}", path.display(), e))?;
        Ok(Some(LoadedEnvFile { path, explicit: true }))
    } else {
        match dotenvy::dotenv() {
            Ok(path) => Ok(Some(LoadedEnvFile { path, explicit: false })),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(format!("failed to load .env: {}", e)),
        }
    }
}

fn main() {
    let loaded_env = match configure_env_from_cli() {
        Ok(info) => info,
        Err(err) => {
            eprintln!("fatal: {}", err);
            std::process::exit(1);
        }
    };

    // Init logging after environment so RUST_LOG from .env is respected.
    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    if let Some(info) = loaded_env.as_ref() {
        let origin = if info.explicit { "CLI-specified" } else { "default" };
        info!("Environment loaded from {} .env file: {}", origin, info.path.display());
    }

    info!(
        "glucotrack-monitor {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );
    if let Err(e) = run() {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
