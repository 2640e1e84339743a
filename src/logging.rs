// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app console
// - La sortie standard sert d'interface : les logs n'y vont pas
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filtre par défaut : debug pour tickerchart, info pour les dépendances
const DEFAULT_FILTER: &str = "tickerchart=debug,info";

/// Initialise le système de logging vers fichier
///
/// CONCEPT RUST : Tracing subscriber
/// - Registry : point central des logs
/// - Layer : transforme et route les logs
/// - EnvFilter : filtre par niveau (RUST_LOG env var)
/// - RollingFileAppender : un fichier par jour (tickerchart.log.2024-01-15)
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/tickerchart/logs/tickerchart.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=tickerchart=trace cargo run
/// ```
pub fn init_logging(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "tickerchart.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(log_dir = %log_dir.display(), "Logging initialisé");
    Ok(())
}
