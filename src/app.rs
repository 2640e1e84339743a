// ============================================================================
// Structure : App
// ============================================================================
// Boucle interactive : recherche → rapport → "Search again (y/n):"
//
// CONCEPTS RUST :
// 1. Génériques : App ne connaît que des traits (KeySource, MarketDataProvider)
//    et un Write, ce qui permet de la tester de bout en bout
// 2. Emprunt : la table des tickers est passée par référence, jamais globale
// 3. Flux strictement linéaire : une étape après l'autre, aucun thread
// ============================================================================

use std::io::Write;

use anyhow::Result;
use tracing::{debug, info, instrument};

use crate::api::MarketDataProvider;
use crate::models::TickerTable;
use crate::ui::console::Console;
use crate::ui::events::{Key, KeySource};
use crate::ui::report::ReportFormatter;
use crate::ui::search::{SearchInput, SearchState};

/// Message affiché pour un ticker inconnu
pub const NOT_FOUND: &str = "No stocks found";

/// Invite de fin de cycle
pub const AGAIN_PROMPT: &str = "Search again (y/n):";

/// Invite de recherche
pub const SEARCH_PROMPT: &str = "Search by ticker: ";

/// État de l'application
pub struct App<'a, P, K, W>
where
    P: MarketDataProvider,
    K: KeySource,
    W: Write,
{
    table: &'a TickerTable,
    provider: P,
    keys: K,
    console: Console<W>,
    formatter: ReportFormatter,
}

impl<'a, P, K, W> App<'a, P, K, W>
where
    P: MarketDataProvider,
    K: KeySource,
    W: Write,
{
    pub fn new(
        table: &'a TickerTable,
        provider: P,
        keys: K,
        console: Console<W>,
        formatter: ReportFormatter,
    ) -> Self {
        Self {
            table,
            provider,
            keys,
            console,
            formatter,
        }
    }

    /// Exécute la boucle jusqu'à 'n' ou Ctrl-C
    pub fn run(&mut self) -> Result<()> {
        loop {
            let query = match self.search()? {
                Some(query) => query,
                None => {
                    info!("Search interrupted");
                    break;
                }
            };

            self.show_report(&query)?;

            if !self.ask_again()? {
                break;
            }
        }

        info!("Leaving interactive loop");
        Ok(())
    }

    /// Saisie interactive du ticker, avec résultats en direct
    ///
    /// Retourne None si l'utilisateur interrompt (Ctrl-C).
    pub fn search(&mut self) -> Result<Option<String>> {
        let mut input = SearchInput::new();

        loop {
            self.console.clear()?;
            self.console
                .print_line(&format!("{}{}", SEARCH_PROMPT, input.query()))?;
            self.console.print_line("")?;

            for entry in self.table.search(input.query()) {
                self.console.print_line(&entry.display())?;
            }

            let key = self.keys.read_key()?;
            if key == Key::Interrupt {
                return Ok(None);
            }

            if input.apply(key) == SearchState::Finalized {
                let query = input.into_query();
                debug!(query = %query, "Search finalized");
                return Ok(Some(query));
            }
        }
    }

    /// Affiche le rapport d'un ticker, ou "No stocks found"
    #[instrument(skip(self))]
    pub fn show_report(&mut self, query: &str) -> Result<()> {
        self.console.clear()?;

        if !self.table.contains(query) {
            info!("Unknown ticker");
            self.console.print_line(NOT_FOUND)?;
            return Ok(());
        }

        let symbol = query.to_uppercase();
        let history = self.provider.fetch_history(&symbol, self.formatter.days());
        let summary = self.provider.fetch_summary(&symbol);

        let lines = self
            .formatter
            .format(&symbol, self.table.name(&symbol), &history, &summary);
        self.console.print_paced(&lines)
    }

    /// "Search again (y/n):" : toute touche sauf 'n' (ou Ctrl-C) relance
    pub fn ask_again(&mut self) -> Result<bool> {
        self.console.print_line("")?;
        self.console.print_line(AGAIN_PROMPT)?;

        let key = self.keys.read_key()?;
        Ok(!matches!(key, Key::Char('n') | Key::Interrupt))
    }

    /// Rend le writer (tests)
    pub fn into_output(self) -> W {
        self.console.into_inner()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
