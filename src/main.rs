//! Binary entry point: resolve configuration, start file logging, open the
//! catalog, run the requested shell, and close the catalog whatever the shell
//! returned.
use std::io;

use anyhow::Context;
use book_catalog::cli::{self, Cli, Command};
use book_catalog::config::Config;
use book_catalog::{logging, run_app, App, Catalog};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.db);
    let _guard = logging::init(&config.log_dir)?;

    tracing::info!(db = %config.db_path.display(), "book catalog starting");
    let catalog = Catalog::open(&config.db_path).with_context(|| {
        format!("failed to open catalog at {}", config.db_path.display())
    })?;

    let (catalog, result) = match cli.command {
        None | Some(Command::Tui) => {
            let mut app = App::new(catalog, config.export_path)?;
            let result = run_app(&mut app);
            (app.into_catalog(), result)
        }
        Some(command) => {
            let result = cli::run(command, &catalog, config.export_path, &mut io::stdout());
            (catalog, result)
        }
    };

    let closed = catalog.close().context("failed to close catalog");
    finish(result, closed)
}

/// Log every failure from the session and from closing the store, then report
/// the session error first.
fn finish(result: anyhow::Result<()>, closed: anyhow::Result<()>) -> anyhow::Result<()> {
    if let Err(err) = &result {
        tracing::error!("{err:#}");
    }
    if let Err(err) = &closed {
        tracing::error!("{err:#}");
    }
    tracing::info!("book catalog shutting down");
    result.and(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn close_failure_fails_a_clean_session() {
        let err = finish(Ok(()), Err(anyhow!("failed to close catalog"))).unwrap_err();
        assert_eq!(err.to_string(), "failed to close catalog");
    }

    #[test]
    fn session_error_wins_over_close_failure() {
        let err = finish(
            Err(anyhow!("book 7 not found")),
            Err(anyhow!("failed to close catalog")),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "book 7 not found");
        assert!(finish(Ok(()), Ok(())).is_ok());
    }
}
