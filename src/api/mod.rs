// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le trait du fournisseur de données et son client
// Yahoo Finance
// ============================================================================

pub mod provider;  // Trait MarketDataProvider + fournisseur en mémoire
pub mod yahoo;     // Client API Yahoo Finance

// Re-export des types principaux
pub use provider::{MarketDataProvider, StaticProvider};
pub use yahoo::YahooProvider;
