// ============================================================================
// Structure : StockSummary
// ============================================================================
// Métadonnées d'un ticker (nom, secteur, capitalisation, moyennes, P/E)
//
// CONCEPT RUST : Option<T> partout
// - Le fournisseur omet souvent des champs : l'absence est un cas normal,
//   pas une erreur
// - Chaque champ est indépendant : un champ manquant n'empêche pas
//   l'affichage des suivants
// ============================================================================

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

/// Sentinelle affichée quand un champ est absent
pub const MISSING: &str = "---";

/// Devise utilisée quand le fournisseur n'en donne pas
pub const DEFAULT_CURRENCY: &str = "USD";

/// Métadonnées d'un ticker, chaque champ présent ou absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
    /// Nom court (ex: "Apple Inc.")
    pub short_name: Option<String>,

    /// Secteur (ex: "Technology")
    pub sector: Option<String>,

    /// Industrie (ex: "Consumer Electronics")
    pub industry: Option<String>,

    /// Devise de cotation (ex: "USD")
    pub currency: Option<String>,

    /// Capitalisation boursière
    pub market_cap: Option<f64>,

    /// Volume de la séance régulière
    pub regular_market_volume: Option<f64>,

    /// Moyenne mobile 200 jours
    pub two_hundred_day_average: Option<f64>,

    /// Moyenne mobile 50 jours
    pub fifty_day_average: Option<f64>,

    /// P/E sur les 12 derniers mois
    pub trailing_pe: Option<f64>,

    /// P/E prévisionnel
    pub forward_pe: Option<f64>,
}

impl StockSummary {
    /// Devise, ou USD par défaut
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Ligne "secteur, industrie" si les deux sont connus
    pub fn sector_line(&self) -> Option<String> {
        match (&self.sector, &self.industry) {
            (Some(sector), Some(industry)) => Some(format!("{}, {}", sector, industry)),
            _ => None,
        }
    }

    /// P/E prévisionnel, un zéro comptant comme absent
    pub fn forward_pe(&self) -> Option<f64> {
        self.forward_pe.filter(|pe| *pe != 0.0)
    }
}

/// Formate une valeur optionnelle, ou la sentinelle si absente
///
/// CONCEPT RUST : Combinateur map_or_else
/// - Remplace un try/except par une simple transformation d'Option
pub fn or_missing<T>(value: Option<T>, format: impl FnOnce(T) -> String) -> String {
    value.map_or_else(|| MISSING.to_string(), format)
}

/// Formate un montant : 2 décimales, milliers séparés par des virgules
///
/// CONCEPT : num-format
/// - La partie entière est groupée selon Locale::en ("1,234,567")
/// - Les centimes sont arrondis une seule fois, puis séparés
///
/// Exemple : 1234567.891 → "1,234,567.89"
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round();
    let units = (cents / 100.0).trunc() as u64;
    let fraction = (cents % 100.0) as u64;

    let sign = if value < 0.0 && cents > 0.0 { "-" } else { "" };
    format!(
        "{}{}.{:02}",
        sign,
        units.to_formatted_string(&Locale::en),
        fraction
    )
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(12.5), "12.50");
        assert_eq!(format_money(999.999), "1,000.00");
        assert_eq!(format_money(1234567.891), "1,234,567.89");
        assert_eq!(format_money(-1234.5), "-1,234.50");
        assert_eq!(format_money(2_950_000_000_000.0), "2,950,000,000,000.00");
        assert_eq!(format_money(51_234_567.0), "51,234,567.00");
        assert_eq!(format_money(0.05), "0.05");
        assert_eq!(format_money(-0.001), "0.00");
    }

    #[test]
    fn test_or_missing() {
        assert_eq!(or_missing(Some(3.5), |v| v.to_string()), "3.5");
        assert_eq!(or_missing(None::<f64>, |v| v.to_string()), "---");
    }

    #[test]
    fn test_sector_line_requires_both() {
        let mut summary = StockSummary {
            sector: Some("Technology".to_string()),
            ..Default::default()
        };
        assert_eq!(summary.sector_line(), None);

        summary.industry = Some("Consumer Electronics".to_string());
        assert_eq!(
            summary.sector_line().as_deref(),
            Some("Technology, Consumer Electronics")
        );
    }

    #[test]
    fn test_forward_pe_zero_is_missing() {
        let summary = StockSummary {
            forward_pe: Some(0.0),
            ..Default::default()
        };
        assert_eq!(summary.forward_pe(), None);
        assert_eq!(summary.currency(), "USD");
    }
}
