// ============================================================================
// Gestion des événements clavier
// ============================================================================
// Lit une touche à la fois depuis le terminal
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter les touches utiles à l'application
// 2. Traits : KeySource abstrait la source (terminal réel ou script de test)
// 3. RAII : le raw mode est désactivé automatiquement par Drop
// ============================================================================

use std::collections::VecDeque;

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{debug, warn};

// ============================================================================
// Enum Key
// ============================================================================

/// Touches reconnues par l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Entrée : valide la saisie
    Enter,

    /// Retour arrière : efface le dernier caractère
    Backspace,

    /// Caractère imprimable
    Char(char),

    /// Ctrl-C (le raw mode intercepte SIGINT)
    Interrupt,

    /// Toute autre touche (flèches, F1, ...)
    Other,
}

impl Key {
    /// Convertit un événement clavier crossterm
    ///
    /// CONCEPT RUST : Pattern matching avec guards
    pub fn from_key_event(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
            // Ctrl-D, Alt-x, ... ne sont pas du texte
            KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                Key::Other
            }
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            _ => Key::Other,
        }
    }
}

// ============================================================================
// Trait KeySource
// ============================================================================

/// Source synchrone de touches
pub trait KeySource {
    /// Bloque jusqu'à la prochaine touche
    fn read_key(&mut self) -> Result<Key>;
}

/// Lecture du terminal via crossterm
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl TerminalKeys {
    pub fn new() -> Self {
        Self
    }
}

/// Garde RAII : raw mode actif tant que la garde existe
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("Échec de l'activation du raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(error = ?e, "Failed to disable raw mode");
        }
    }
}

impl KeySource for TerminalKeys {
    /// Lit une touche en raw mode, puis restaure le terminal
    ///
    /// CONCEPT : Raw mode limité à la lecture
    /// - Les println! ailleurs fonctionnent normalement (\n non traduit en raw)
    /// - Seuls les événements Press sont retenus (pas Release/Repeat)
    fn read_key(&mut self) -> Result<Key> {
        let _guard = RawModeGuard::enable()?;
        loop {
            match event::read().context("Échec de la lecture clavier")? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    let key = Key::from_key_event(key);
                    debug!(?key, "Key read");
                    return Ok(key);
                }
                // Resize, souris, Release : ignorés
                _ => continue,
            }
        }
    }
}

/// Source de touches scriptée (tests, démonstrations)
///
/// Quand le script est épuisé, renvoie Interrupt pour terminer proprement.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<Key>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Script à partir d'un texte : '\n' → Enter, '\x7f' → Backspace
    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars().map(|c| match c {
            '\n' => Key::Enter,
            '\x7f' => Key::Backspace,
            c => Key::Char(c),
        }))
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> Result<Key> {
        Ok(self.keys.pop_front().unwrap_or(Key::Interrupt))
    }
}

// ============================================================================
// Tests
// ============================================================================
