//! Acme demo binary: runs the fixed data-access demonstration once.
//!
//! Results go to stdout, logs to stderr. Exits non-zero if configuration,
//! migrations, or an unhandled storage error stop the run.

use std::process::ExitCode;

use acme_demo::config;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("ACME_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn main() -> ExitCode {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("acme.toml"));

    let config = match config::load_config(selected_config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    acme_demo::init_tracing(&config.logging);

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        db = %config.database.path,
        "resolved startup configuration"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match acme_demo::run(&config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "demo sequence stopped");
            ExitCode::FAILURE
        }
    }
}
