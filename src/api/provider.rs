// ============================================================================
// Trait : MarketDataProvider
// ============================================================================
// Abstraction du fournisseur de données (Yahoo Finance, ou faux fournisseur
// en test)
//
// CONCEPT RUST : Traits comme point d'injection
// - L'application ne connaît que le trait
// - Les deux appels sont séparés : l'échec de l'un n'empêche pas l'autre
// ============================================================================

use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::models::{PriceSeries, StockSummary};

/// Fournisseur de prix et de métadonnées (appels synchrones)
pub trait MarketDataProvider {
    /// Historique des clôtures sur `days` jours demandés
    fn fetch_history(&self, symbol: &str, days: u32) -> Result<PriceSeries>;

    /// Métadonnées du ticker
    fn fetch_summary(&self, symbol: &str) -> Result<StockSummary>;
}

/// Fournisseur en mémoire : données fixes par symbole
///
/// Utile pour les tests et pour une démonstration hors ligne.
/// Un symbole inconnu produit une erreur, comme un vrai fournisseur.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    histories: HashMap<String, PriceSeries>,
    summaries: HashMap<String, StockSummary>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un historique (clé en majuscules)
    pub fn with_history(mut self, series: PriceSeries) -> Self {
        self.histories.insert(series.symbol.to_uppercase(), series);
        self
    }

    /// Ajoute des métadonnées (clé en majuscules)
    pub fn with_summary(mut self, symbol: &str, summary: StockSummary) -> Self {
        self.summaries.insert(symbol.to_uppercase(), summary);
        self
    }
}

impl MarketDataProvider for StaticProvider {
    fn fetch_history(&self, symbol: &str, _days: u32) -> Result<PriceSeries> {
        self.histories
            .get(&symbol.to_uppercase())
            .cloned()
            .ok_or_else(|| anyhow!("No price history for {}", symbol))
    }

    fn fetch_summary(&self, symbol: &str) -> Result<StockSummary> {
        self.summaries
            .get(&symbol.to_uppercase())
            .cloned()
            .ok_or_else(|| anyhow!("No summary for {}", symbol))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_lookup() {
        let provider = StaticProvider::new()
            .with_history(PriceSeries::new("AAPL".to_string(), Vec::new()))
            .with_summary("aapl", StockSummary::default());

        assert!(provider.fetch_history("aapl", 30).is_ok());
        assert!(provider.fetch_summary("AAPL").is_ok());
        assert!(provider.fetch_history("MSFT", 30).is_err());
        assert!(provider.fetch_summary("MSFT").is_err());
    }
}
