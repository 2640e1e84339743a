// ============================================================================
// TickerChart - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Fournisseur de données (Yahoo Finance)
pub mod app;       // Boucle interactive
pub mod config;    // Configuration par variables d'environnement
pub mod logging;   // Logs vers fichier
pub mod models;    // Structures de données
pub mod ui;        // Interface console
