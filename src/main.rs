// ============================================================================
// TickerChart - Recherche de ticker et graphique console
// ============================================================================
// Programme console : recherche floue d'un ticker, récupération de
// l'historique et des métadonnées sur Yahoo Finance, puis affichage d'un
// graphique en blocs Unicode et de quelques statistiques
//
// Flux strictement linéaire : recherche → récupération → graphique → rapport
// ============================================================================

use std::io::{self, IsTerminal};

use anyhow::Result;
use tracing::{error, info};

use tickerchart::api::YahooProvider;
use tickerchart::app::App;
use tickerchart::config::Config;
use tickerchart::logging::init_logging;
use tickerchart::models::TickerTable;
use tickerchart::ui::{ChartRenderer, Console, ReportFormatter, TerminalKeys};

fn main() -> Result<()> {
    let config = Config::from_env();

    // Logging avant tout le reste
    // - Si init échoue, on affiche l'erreur et continue quand même
    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(?config, "TickerChart starting up");
    config.log_warnings();

    // Table chargée une fois, empruntée par l'application
    let table = TickerTable::load(config.tickers_path.as_deref())?;
    let provider = YahooProvider::new()?;

    let stdout = io::stdout();
    let colored = stdout.is_terminal();
    let console = Console::new(stdout, config.row_delay);
    let formatter = ReportFormatter::new(ChartRenderer::new(config.days), colored);

    let mut app = App::new(&table, provider, TerminalKeys::new(), console, formatter);
    let result = app.run();

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}
