// ============================================================================
// Structure : TickerTable
// ============================================================================
// Table statique symbole → nom de société, chargée une fois au démarrage
//
// CONCEPTS RUST :
// 1. Vec + HashMap : ordre du fichier conservé, recherche exacte en O(1)
// 2. Immutabilité : aucune méthode &mut, la table est passée par référence
// 3. Iterators : filter + take pour arrêter le parcours dès 25 résultats
// ============================================================================

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

/// Nombre maximum de résultats de recherche
pub const MAX_RESULTS: usize = 25;

/// Au-delà de cette longueur, le nom est tronqué dans les résultats
const MAX_NAME_LEN: usize = 50;

/// Longueur conservée d'un nom tronqué
const TRUNCATED_NAME_LEN: usize = 46;

/// Table par défaut, embarquée dans le binaire
pub const BUNDLED_TICKERS: &str = include_str!("../../tickers.json");

/// Erreurs de chargement de la table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("ticker table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ticker table must be a JSON object of SYMBOL -> name")]
    NotAnObject,

    #[error("ticker {symbol} has a non-string name")]
    InvalidName { symbol: String },
}

/// Une entrée de la table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerEntry {
    /// Symbole (ex: "AAPL")
    pub symbol: String,

    /// Nom affiché (ex: "Apple Inc. Common Stock")
    pub name: String,
}

/// Table des tickers connus
#[derive(Debug, Clone, Default)]
pub struct TickerTable {
    /// Entrées dans l'ordre du fichier (détermine l'ordre des résultats)
    entries: Vec<TickerEntry>,

    /// Symbole en majuscules → index dans `entries`
    index: HashMap<String, usize>,
}

impl TickerTable {
    /// Construit une table à partir de paires (symbole, nom)
    ///
    /// En cas de doublon (insensible à la casse), la première entrée gagne.
    pub fn from_entries<I, S, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, N)>,
        S: Into<String>,
        N: Into<String>,
    {
        let mut table = Self::default();
        for (symbol, name) in entries {
            let symbol = symbol.into();
            let key = symbol.to_uppercase();
            if table.index.contains_key(&key) {
                continue;
            }
            table.index.insert(key, table.entries.len());
            table.entries.push(TickerEntry {
                symbol,
                name: name.into(),
            });
        }
        table
    }

    /// Parse une table JSON `{ "SYMBOL": "name", ... }`
    ///
    /// CONCEPT : serde_json avec "preserve_order"
    /// - Map conserve l'ordre d'apparition des clés
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let value: Value = serde_json::from_str(json)?;
        let object: Map<String, Value> = match value {
            Value::Object(object) => object,
            _ => return Err(TableError::NotAnObject),
        };

        let mut pairs = Vec::with_capacity(object.len());
        for (symbol, name) in object {
            match name {
                Value::String(name) => pairs.push((symbol, name)),
                _ => return Err(TableError::InvalidName { symbol }),
            }
        }

        Ok(Self::from_entries(pairs))
    }

    /// Charge la table depuis un fichier, ou la table embarquée si `path` est None
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let table = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading ticker table from file");
                let json = std::fs::read_to_string(path).with_context(|| {
                    format!("Échec de la lecture de la table des tickers {}", path.display())
                })?;
                Self::from_json(&json)
                    .with_context(|| format!("Table des tickers invalide : {}", path.display()))?
            }
            None => {
                debug!("Loading bundled ticker table");
                Self::from_json(BUNDLED_TICKERS).context("Table des tickers embarquée invalide")?
            }
        };

        info!(tickers = table.len(), "Ticker table loaded");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recherche floue : symbole ou nom contenant `query` (insensible à la casse)
    ///
    /// - Requête vide → aucun résultat
    /// - Ordre de la table conservé
    /// - Le parcours s'arrête dès que 25 résultats sont trouvés
    pub fn search(&self, query: &str) -> Vec<&TickerEntry> {
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry.symbol.to_lowercase().contains(&needle)
                    || entry.name.to_lowercase().contains(&needle)
            })
            .take(MAX_RESULTS)
            .collect()
    }

    /// Vérifie si le symbole existe exactement (insensible à la casse)
    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(&symbol.to_uppercase())
    }

    /// Retourne l'entrée d'un symbole exact
    pub fn get(&self, symbol: &str) -> Option<&TickerEntry> {
        self.index
            .get(&symbol.to_uppercase())
            .and_then(|&i| self.entries.get(i))
    }

    /// Retourne le nom associé à un symbole exact
    pub fn name(&self, symbol: &str) -> Option<&str> {
        self.get(symbol).map(|entry| entry.name.as_str())
    }
}

impl TickerEntry {
    /// Formatte l'entrée pour la liste de résultats
    ///
    /// Format : "AAPL - Apple Inc. Common Stock"
    /// Les noms de plus de 50 caractères sont tronqués à 46 + " ..."
    pub fn display(&self) -> String {
        if self.name.chars().count() <= MAX_NAME_LEN {
            format!("{} - {}", self.symbol, self.name)
        } else {
            let truncated: String = self.name.chars().take(TRUNCATED_NAME_LEN).collect();
            format!("{} - {} ...", self.symbol, truncated)
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TickerTable {
        TickerTable::from_entries([
            ("AAPL", "Apple Inc."),
            ("MSFT", "Microsoft Corporation"),
            ("APLE", "Apple Hospitality REIT"),
            ("GOOG", "Alphabet Inc."),
        ])
    }

    #[test]
    fn test_search_symbol_and_name() {
        let table = table();
        let symbols: Vec<&str> = table.search("apple").iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "APLE"]);

        let symbols: Vec<&str> = table.search("Ap").iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "APLE"]);

        // Correspondance sur le nom seul
        let symbols: Vec<&str> = table.search("ALPHA").iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["GOOG"]);
    }

    #[test]
    fn test_search_empty_query() {
        assert!(table().search("").is_empty());
    }

    #[test]
    fn test_search_stops_at_limit_in_table_order() {
        let entries: Vec<(String, String)> = (0..40)
            .map(|i| (format!("T{:02}", i), format!("Test Company {}", i)))
            .collect();
        let table = TickerTable::from_entries(entries);

        let results = table.search("test");
        assert_eq!(results.len(), MAX_RESULTS);
        assert_eq!(results.first().map(|e| e.symbol.as_str()), Some("T00"));
        assert_eq!(results.last().map(|e| e.symbol.as_str()), Some("T24"));
    }

    #[test]
    fn test_contains_is_exact_and_case_insensitive() {
        let table = table();
        assert!(table.contains("aapl"));
        assert!(table.contains("MSFT"));
        assert!(!table.contains("AAP"));
        assert!(!table.contains("ZZZZZZ"));
        assert_eq!(table.name("goog"), Some("Alphabet Inc."));
    }

    #[test]
    fn test_from_json_preserves_order() {
        let table = TickerTable::from_json(r#"{"ZZ": "Last Alpha", "AA": "First Alpha"}"#).unwrap();
        let symbols: Vec<&str> = table.search("alpha").iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ZZ", "AA"]);
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(TickerTable::from_json("[]"), Err(TableError::NotAnObject)));
        assert!(matches!(
            TickerTable::from_json(r#"{"A": 1}"#),
            Err(TableError::InvalidName { .. })
        ));
        assert!(matches!(TickerTable::from_json("{"), Err(TableError::Json(_))));
    }

    #[test]
    fn test_bundled_table_loads() {
        let table = TickerTable::load(None).unwrap();
        assert!(!table.is_empty());
        assert!(table.contains("AAPL"));
    }

    #[test]
    fn test_display_truncates_long_names() {
        let short = TickerEntry {
            symbol: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
        };
        assert_eq!(short.display(), "AAPL - Apple Inc.");

        let long = TickerEntry {
            symbol: "LONG".to_string(),
            name: "X".repeat(60),
        };
        assert_eq!(long.display(), format!("LONG - {} ...", "X".repeat(46)));
    }
}
