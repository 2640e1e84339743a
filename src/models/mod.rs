// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module public (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod price_series;  // Série de prix de clôture (price_series.rs)
pub mod summary;       // Métadonnées d'un ticker (summary.rs)
pub mod ticker_table;  // Table statique symbole → nom (ticker_table.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use tickerchart::models::ticker_table::TickerTable;
// On peut faire : use tickerchart::models::TickerTable;
pub use price_series::{ChartError, PricePoint, PriceSeries, Trend};
pub use summary::StockSummary;
pub use ticker_table::{TickerEntry, TickerTable};
