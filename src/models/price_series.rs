// ============================================================================
// Structure : PriceSeries
// ============================================================================
// Série chronologique des prix de clôture d'un ticker
//
// CONCEPTS RUST :
// 1. DateTime<Utc> : type de chrono pour dates avec timezone UTC
// 2. Vec<T> privé + accesseurs : la série est immuable une fois construite
// 3. thiserror : erreurs du domaine typées, affichables telles quelles
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nombre minimum de points pour calculer une variation (avant-dernier + dernier)
pub const MIN_POINTS: usize = 2;

/// Erreurs liées aux données de prix
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// La série ne contient pas assez de points
    #[error("not enough price data: need at least {required} closes, got {actual}")]
    NotEnoughData { required: usize, actual: usize },

    /// Clôture précédente nulle : variation non définie
    #[error("cannot compute percent change: previous close is {previous}")]
    ZeroPreviousClose { previous: f64 },
}

/// Tendance globale de la série (couleur du graphique)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Dernier prix >= premier prix
    Up,
    /// Dernier prix < premier prix
    Down,
}

impl Trend {
    /// Tendance d'une variation : une variation nulle compte comme une hausse
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

/// Un prix de clôture horodaté
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Timestamp de la séance
    pub timestamp: DateTime<Utc>,

    /// Prix de clôture (Close)
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Collection de prix de clôture, triés par timestamp croissant
///
/// CONCEPT RUST : Encapsulation
/// - Le Vec est privé : personne ne peut réordonner ou modifier les points
/// - La construction trie les points une fois pour toutes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Symbole du ticker
    pub symbol: String,

    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Crée une série à partir de points (dans n'importe quel ordre)
    pub fn new(symbol: String, mut points: Vec<PricePoint>) -> Self {
        // sort_by_key est stable : deux points au même timestamp gardent leur ordre
        points.sort_by_key(|p| p.timestamp);
        Self { symbol, points }
    }

    /// Retourne le nombre de points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Vérifie si la série est vide
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Les prix de clôture seuls
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Avant-dernier point (clôture précédente)
    pub fn previous(&self) -> Option<&PricePoint> {
        self.points.len().checked_sub(2).and_then(|i| self.points.get(i))
    }

    /// Vérifie que la série contient au moins `required` points
    ///
    /// CONCEPT : Erreur explicite plutôt qu'un index hors limites
    pub fn require(&self, required: usize) -> Result<(), ChartError> {
        if self.points.len() < required {
            Err(ChartError::NotEnoughData {
                required,
                actual: self.points.len(),
            })
        } else {
            Ok(())
        }
    }

    /// Prix de clôture minimum
    pub fn min_close(&self) -> Option<f64> {
        self.points.iter().map(|p| p.close).reduce(f64::min)
    }

    /// Prix de clôture maximum
    pub fn max_close(&self) -> Option<f64> {
        self.points.iter().map(|p| p.close).reduce(f64::max)
    }

    /// Variation en pourcentage entre les deux dernières clôtures,
    /// arrondie à 3 décimales
    ///
    /// Seuls les deux derniers points comptent, le reste de la série est ignoré.
    /// Une clôture précédente nulle donnerait inf ou NaN : c'est une erreur.
    pub fn percent_change(&self) -> Result<f64, ChartError> {
        self.require(MIN_POINTS)?;
        let n = self.points.len();
        let previous = self.points[n - 2].close;
        let current = self.points[n - 1].close;

        let change = (current / previous - 1.0) * 100.0;
        if previous == 0.0 || !change.is_finite() {
            return Err(ChartError::ZeroPreviousClose { previous });
        }
        Ok(round_to(change, 3))
    }

    /// Variation absolue entre le premier et le dernier point
    pub fn total_change(&self) -> Option<f64> {
        Some(self.last()?.close - self.first()?.close)
    }

    /// Tendance globale (premier → dernier)
    pub fn trend(&self) -> Option<Trend> {
        self.total_change().map(Trend::from_change)
    }
}

/// Arrondit `value` à `decimals` décimales
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Représentation la plus courte d'un flottant, avec au moins une décimale
///
/// Exemples : 12.5 → "12.5", 10.0 → "10.0", -3.25 → "-3.25"
pub fn short_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
