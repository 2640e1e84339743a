// ============================================================================
// Configuration
// ============================================================================
// Pas de flags en ligne de commande : tout vient de l'environnement,
// éventuellement chargé depuis un fichier .env (dotenvy)
//
// Variables :
// - TICKERCHART_TICKERS : chemin de la table JSON (défaut : table embarquée)
// - TICKERCHART_DAYS : nombre de jours du graphique (défaut 30, max 60)
// - TICKERCHART_ROW_DELAY_MS : pause entre les lignes affichées (défaut 30)
// - TICKERCHART_LOG_DIR : répertoire des logs
// ============================================================================

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::ui::chart::clamp_days;

/// Nombre de jours par défaut
pub const DEFAULT_DAYS: u32 = 30;

/// Pause par défaut entre deux lignes (ms)
pub const DEFAULT_ROW_DELAY_MS: u64 = 30;

const ENV_TICKERS: &str = "TICKERCHART_TICKERS";
const ENV_DAYS: &str = "TICKERCHART_DAYS";
const ENV_ROW_DELAY_MS: &str = "TICKERCHART_ROW_DELAY_MS";
const ENV_LOG_DIR: &str = "TICKERCHART_LOG_DIR";

/// Configuration de l'application
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Table des tickers (None = table embarquée)
    pub tickers_path: Option<PathBuf>,

    /// Jours demandés, déjà bornés à 1..=60
    pub days: u32,

    /// Pause entre les lignes du rapport
    pub row_delay: Duration,

    /// Répertoire des logs
    pub log_dir: PathBuf,

    /// Valeurs invalides ignorées, à logger une fois le logging prêt
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tickers_path: None,
            days: DEFAULT_DAYS,
            row_delay: Duration::from_millis(DEFAULT_ROW_DELAY_MS),
            log_dir: default_log_dir(),
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Charge .env s'il existe, puis lit l'environnement
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lecture
    ///
    /// CONCEPT RUST : Injection d'une closure
    /// - En production : std::env::var
    /// - En test : une HashMap, sans toucher à l'environnement du process
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mut warnings = Vec::new();

        let tickers_path = lookup(ENV_TICKERS)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let days = parse_or(ENV_DAYS, lookup(ENV_DAYS), defaults.days, &mut warnings);
        let row_delay_ms = parse_or(
            ENV_ROW_DELAY_MS,
            lookup(ENV_ROW_DELAY_MS),
            DEFAULT_ROW_DELAY_MS,
            &mut warnings,
        );

        let log_dir = lookup(ENV_LOG_DIR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        Self {
            tickers_path,
            days: clamp_days(days),
            row_delay: Duration::from_millis(row_delay_ms),
            log_dir,
            warnings,
        }
    }

    /// Logge les valeurs invalides retenues pendant le chargement
    ///
    /// CONCEPT : La configuration est lue avant l'installation du subscriber
    /// tracing, un warn! à ce moment-là serait perdu
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

/// Parse une valeur, ou garde le défaut en notant un warning
fn parse_or<T: FromStr + Copy>(key: &str, value: Option<String>, default: T, warnings: &mut Vec<String>) -> T {
    match value {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warnings.push(format!("Invalid configuration value {}={:?}, using default", key, raw));
                default
            }
        },
    }
}

/// Répertoire de logs : ~/.local/share/tickerchart/logs, sinon ./logs
///
/// - Linux/WSL : ~/.local/share/tickerchart/logs
/// - macOS : ~/Library/Application Support/tickerchart/logs
/// - Windows : C:\Users\<user>\AppData\Local\tickerchart\logs
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("tickerchart").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.tickers_path, None);
        assert_eq!(config.days, 30);
        assert_eq!(config.row_delay, Duration::from_millis(30));
        assert_eq!(config.log_dir, default_log_dir());
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("TICKERCHART_TICKERS", "/tmp/tickers.json"),
            ("TICKERCHART_DAYS", "10"),
            ("TICKERCHART_ROW_DELAY_MS", "0"),
            ("TICKERCHART_LOG_DIR", "/tmp/logs"),
        ]);
        assert_eq!(config.tickers_path, Some(PathBuf::from("/tmp/tickers.json")));
        assert_eq!(config.days, 10);
        assert!(config.row_delay.is_zero());
        assert_eq!(config.log_dir, PathBuf::from("/tmp/logs"));
    }

    #[test]
    fn test_days_are_clamped() {
        assert_eq!(config(&[("TICKERCHART_DAYS", "365")]).days, 60);
        assert_eq!(config(&[("TICKERCHART_DAYS", "0")]).days, 1);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[("TICKERCHART_DAYS", "soon"), ("TICKERCHART_ROW_DELAY_MS", "-5")]);
        assert_eq!(config.days, 30);
        assert_eq!(config.row_delay, Duration::from_millis(30));

        // Les deux valeurs rejetées sont gardées pour le log
        assert_eq!(config.warnings.len(), 2);
        assert!(config.warnings[0].contains("TICKERCHART_DAYS=\"soon\""));
        assert!(config.warnings[1].contains("TICKERCHART_ROW_DELAY_MS"));
    }
}
