// ============================================================================
// Chart - Graphique en barres texte (blocs Unicode)
// ============================================================================
// Transforme une série de prix de clôture en une grille de 21 lignes,
// plus 2 lignes d'axe X (règle + dates)
//
// ALGORITHME :
// - 21 niveaux d'intensité : seuil(i) = min + range * i / 20
// - Pour chaque prix et chaque niveau :
//     prix >= seuil(i)              → bloc plein  █
//     prix >= seuil(i) - range / 40 → demi-bloc   ▄
//     sinon                         → vide
// - Le niveau i est dessiné sur la ligne 20 - i (le plus haut en haut)
// - Chaque prix occupe `scale` colonnes (compression horizontale)
//
// AXE Y :
// - 11 labels : min + range * i / 10, sur les lignes paires (0, 2, ..., 20)
// - Lignes impaires : label vide de même largeur (alignement)
//
// SÉRIE PLATE (range == 0) :
// - Tous les seuils valent min, aucun dénominateur n'utilise range
// - Chaque prix est donc un bloc plein à tous les niveaux
// ============================================================================

use crossterm::style::{Color, Stylize};

use crate::models::price_series::{round_to, short_float, MIN_POINTS};
use crate::models::{ChartError, PriceSeries, Trend};

// ============================================================================
// Constantes
// ============================================================================

/// Nombre de lignes du corps du graphique (niveaux 0..=20)
pub const CHART_ROWS: usize = 21;

/// Nombre de labels de l'axe Y
pub const AXIS_LABELS: usize = 11;

/// Plus haut niveau d'intensité
const TOP_LEVEL: usize = CHART_ROWS - 1;

/// Nombre maximum de jours demandés
pub const MAX_DAYS: u32 = 60;

/// Caractères Unicode du graphique
const BLOCK: char = '█';
const HALF_BLOCK: char = '▄';
const VOID: char = ' ';

/// Séparateur entre l'axe Y et le corps du graphique
const AXIS_SEPARATOR: &str = " | ";

/// Couleurs de la série (hausse / baisse)
pub const UP_COLOR: Color = Color::Rgb { r: 56, g: 255, b: 75 };
pub const DOWN_COLOR: Color = Color::Rgb { r: 252, g: 36, b: 3 };

/// Format des dates de l'axe X
const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Glyph
// ============================================================================

/// État d'une cellule du graphique
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Prix au-dessus du seuil
    Full,
    /// Prix dans le demi-pas sous le seuil
    Half,
    /// Prix trop bas
    Blank,
}

impl Glyph {
    pub fn as_char(&self) -> char {
        match self {
            Glyph::Full => BLOCK,
            Glyph::Half => HALF_BLOCK,
            Glyph::Blank => VOID,
        }
    }
}

/// Couleur associée à une tendance
pub fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => UP_COLOR,
        Trend::Down => DOWN_COLOR,
    }
}

// ============================================================================
// AxisScale
// ============================================================================

/// Échelle verticale dérivée du min et du max de la série
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub min: f64,
    pub max: f64,
}

impl AxisScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Construit l'échelle d'une série (None si vide)
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        Some(Self::new(series.min_close()?, series.max_close()?))
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Seuil du niveau `level` : min + range * level / 20
    pub fn threshold(&self, level: usize) -> f64 {
        self.min + self.range() * (level as f64 / TOP_LEVEL as f64)
    }

    /// Valeur du label `i` : min + range * i / 10
    pub fn increment(&self, i: usize) -> f64 {
        self.min + self.range() * (i as f64 / (AXIS_LABELS - 1) as f64)
    }

    /// Les 11 valeurs de l'axe Y, croissantes
    pub fn increments(&self) -> Vec<f64> {
        (0..AXIS_LABELS).map(|i| self.increment(i)).collect()
    }

    /// Largeur des labels : chiffres de la partie entière du max + 3
    pub fn label_width(&self) -> usize {
        (self.max.trunc() as i64).to_string().len() + 3
    }

    /// Formate un label : arrondi à 2 décimales, complété par des zéros
    ///
    /// Exemple (largeur 6) : 123.4 → "123.40", 95.5 → "95.500"
    pub fn label(&self, value: f64) -> String {
        let mut text = short_float(round_to(value, 2));
        let width = self.label_width();
        while text.len() < width {
            text.push('0');
        }
        text
    }

    /// Classe un prix pour un niveau donné
    ///
    /// L'ordre des tests compte : plein d'abord, demi-bloc ensuite.
    /// Un prix exactement sur le seuil est plein.
    pub fn classify(&self, price: f64, level: usize) -> Glyph {
        let threshold = self.threshold(level);
        if price >= threshold {
            Glyph::Full
        } else if price >= threshold - self.range() / 40.0 {
            Glyph::Half
        } else {
            Glyph::Blank
        }
    }
}

// ============================================================================
// ChartGrid
// ============================================================================

/// Une ligne du corps du graphique
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    /// Label de l'axe Y (vide sur les lignes impaires, même largeur)
    pub label: String,

    /// Une cellule par prix, dans l'ordre chronologique
    pub cells: Vec<Glyph>,
}

/// Grille rendue : 21 lignes de corps + 2 lignes d'axe X
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGrid {
    pub rows: Vec<ChartRow>,

    /// Règle horizontale et ligne des dates
    pub trailer: [String; 2],

    /// Couleur uniforme de la série
    pub trend: Trend,

    /// Colonnes par prix
    pub scale: usize,
}

impl ChartGrid {
    /// Lignes sans couleur (tests, logs)
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines_with(|glyph| glyph.as_char().to_string())
    }

    /// Lignes avec codes couleur ANSI sur chaque bloc
    pub fn colored_lines(&self) -> Vec<String> {
        let color = trend_color(self.trend);
        self.lines_with(|glyph| match glyph {
            Glyph::Blank => VOID.to_string(),
            _ => glyph.as_char().with(color).to_string(),
        })
    }

    /// Assemble les lignes, `paint` formatant une cellule
    ///
    /// CONCEPT RUST : Closure générique (impl Fn)
    /// - Un seul algorithme d'assemblage pour les deux rendus
    fn lines_with(&self, paint: impl Fn(Glyph) -> String) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + self.trailer.len());

        for row in &self.rows {
            let mut line = String::new();
            line.push_str(&row.label);
            line.push_str(AXIS_SEPARATOR);
            for &glyph in &row.cells {
                line.push_str(&paint(glyph).repeat(self.scale));
            }
            lines.push(line);
        }

        lines.extend(self.trailer.iter().cloned());
        lines
    }
}

// ============================================================================
// ChartRenderer
// ============================================================================

/// Renderer du graphique pour un nombre de jours donné
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRenderer {
    days: u32,
    scale: usize,
}

impl ChartRenderer {
    /// Crée un renderer ; `days` est borné à 1..=60
    pub fn new(days: u32) -> Self {
        let days = clamp_days(days);
        Self {
            days,
            scale: scale_for_days(days),
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Génère la grille complète pour une série de prix
    pub fn render(&self, series: &PriceSeries) -> Result<ChartGrid, ChartError> {
        series.require(MIN_POINTS)?;

        let closes = series.closes();
        let scale = AxisScale::from_series(series).ok_or(ChartError::NotEnoughData {
            required: MIN_POINTS,
            actual: 0,
        })?;
        let trend = series.trend().unwrap_or(Trend::Up);
        let width = scale.label_width();

        // Labels : valeur la plus haute sur la ligne 0
        let mut labels = scale.increments();
        labels.reverse();

        let mut rows: Vec<ChartRow> = (0..CHART_ROWS)
            .map(|row| ChartRow {
                label: if row % 2 == 0 {
                    scale.label(labels[row / 2])
                } else {
                    " ".repeat(width)
                },
                cells: Vec::with_capacity(closes.len()),
            })
            .collect();

        for &close in &closes {
            for level in 0..CHART_ROWS {
                rows[TOP_LEVEL - level].cells.push(scale.classify(close, level));
            }
        }

        Ok(ChartGrid {
            rows,
            trailer: self.trailer(series, width),
            trend,
            scale: self.scale,
        })
    }

    /// Lignes d'axe X : règle horizontale puis dates de début et de fin
    fn trailer(&self, series: &PriceSeries, width: usize) -> [String; 2] {
        let span = self.days as usize;

        let rule = format!(
            "{}└ {}",
            " ".repeat(width + 1),
            "─".repeat(2 * (span + 1))
        );

        let start = series
            .first()
            .map(|p| p.timestamp.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        let end = series
            .last()
            .map(|p| p.timestamp.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        let end_width = (2 * span).saturating_sub(start.chars().count());
        let dates = format!(
            "{}{}{:>end_width$}",
            " ".repeat(width + 3),
            start,
            end,
            end_width = end_width
        );

        [rule, dates]
    }
}

/// Borne le nombre de jours à 1..=60
pub fn clamp_days(days: u32) -> u32 {
    days.clamp(1, MAX_DAYS)
}

/// Facteur de compression horizontale : 5 jours → 4, 10 jours → 2, sinon 1
pub fn scale_for_days(days: u32) -> usize {
    match days {
        5 => 4,
        10 => 2,
        _ => 1,
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
