// ============================================================================
// Saisie de recherche
// ============================================================================
// Machine à états de la saisie du ticker, touche par touche
//
// CONCEPT RUST : Enums pour state machines
// - Editing : état initial, seul état non terminal
// - Finalized : Entrée pressée, la requête ne bouge plus
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

use crate::ui::events::Key;

/// État de la saisie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Saisie en cours
    Editing,

    /// Saisie validée
    Finalized,
}

/// Buffer de saisie et son état
#[derive(Debug, Clone)]
pub struct SearchInput {
    buffer: String,
    state: SearchState,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchInput {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            state: SearchState::Editing,
        }
    }

    /// Applique une touche et retourne le nouvel état
    ///
    /// - Enter : Editing → Finalized
    /// - Backspace : retire le dernier caractère (rien si vide)
    /// - Char : ajoute au buffer
    /// - Une fois Finalized, les touches sont ignorées
    pub fn apply(&mut self, key: Key) -> SearchState {
        if self.state == SearchState::Finalized {
            return self.state;
        }

        match key {
            Key::Enter => self.state = SearchState::Finalized,
            Key::Backspace => {
                self.buffer.pop();
            }
            Key::Char(c) => self.buffer.push(c),
            Key::Interrupt | Key::Other => {}
        }

        self.state
    }

    /// Texte saisi
    pub fn query(&self) -> &str {
        &self.buffer
    }

    /// Consomme la saisie et retourne le texte
    pub fn into_query(self) -> String {
        self.buffer
    }
}

// ============================================================================
// Tests
// ============================================================================
