// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface console : saisie, graphique, rapport
// ============================================================================

pub mod chart;    // Rendu du graphique en blocs Unicode
pub mod console;  // Sortie ligne par ligne avec pause
pub mod events;   // Lecture des touches
pub mod report;   // Mise en forme du rapport d'un ticker
pub mod search;   // Machine à états de la saisie

// Re-exports pour simplifier les imports
pub use chart::{ChartGrid, ChartRenderer};
pub use console::Console;
pub use events::{Key, KeySource, ScriptedKeys, TerminalKeys};
pub use report::ReportFormatter;
pub use search::{SearchInput, SearchState};
