// ============================================================================
// Console - Sortie ligne par ligne
// ============================================================================
// Écrit les lignes du rapport sur un Write quelconque (stdout, Vec<u8>)
//
// CONCEPTS RUST :
// 1. Générique W: Write : même code pour le terminal et les tests
// 2. Pacing injectable : petite pause entre les lignes (effet d'animation)
//    Duration::ZERO désactive la pause
// ============================================================================

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};

/// Console orientée ligne
pub struct Console<W: Write> {
    out: W,
    line_delay: Duration,
}

impl<W: Write> Console<W> {
    /// Crée une console ; `line_delay` = pause après chaque ligne rythmée
    pub fn new(out: W, line_delay: Duration) -> Self {
        Self { out, line_delay }
    }

    /// Efface l'écran et replace le curseur en haut à gauche
    pub fn clear(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))
            .context("Échec de l'effacement de l'écran")?;
        self.out.flush().context("Échec du flush de la console")?;
        Ok(())
    }

    /// Écrit une ligne
    pub fn print_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line).context("Échec de l'écriture console")?;
        Ok(())
    }

    /// Écrit des lignes une par une, avec la pause entre chaque
    pub fn print_paced(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            self.print_line(line)?;
            self.out.flush().context("Échec du flush de la console")?;
            if !self.line_delay.is_zero() {
                std::thread::sleep(self.line_delay);
            }
        }
        Ok(())
    }

    /// Rend le writer sous-jacent
    pub fn into_inner(self) -> W {
        self.out
    }
}

// ============================================================================
// Tests
// ============================================================================
