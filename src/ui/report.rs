// ============================================================================
// Report - Mise en forme du rapport d'un ticker
// ============================================================================
// Assemble les lignes affichées pour un ticker :
// - En-tête : symbole, nom, secteur
// - Section graphique : clôtures, variation, graphique (ou "No graph")
// - Métadonnées : capitalisation, volume, moyennes, P/E
//
// CONCEPT : Chaque champ est indépendant
// - Un champ absent devient "---" sans couleur
// - Un échec de l'historique n'empêche pas les métadonnées, et inversement
// ============================================================================

use anyhow::Result;
use crossterm::style::{Color, Stylize};
use tracing::{debug, warn};

use crate::models::price_series::short_float;
use crate::models::summary::{format_money, or_missing, MISSING};
use crate::models::{PriceSeries, StockSummary, Trend};
use crate::ui::chart::{trend_color, ChartRenderer, UP_COLOR};

/// Mise en forme du rapport
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    renderer: ChartRenderer,
    colored: bool,
}

impl ReportFormatter {
    /// `colored` = false produit un texte sans codes ANSI
    pub fn new(renderer: ChartRenderer, colored: bool) -> Self {
        Self { renderer, colored }
    }

    /// Nombre de jours du graphique
    pub fn days(&self) -> u32 {
        self.renderer.days()
    }

    /// Génère toutes les lignes du rapport
    ///
    /// # Arguments
    /// * `symbol` - Ticker (affiché en majuscules)
    /// * `table_name` - Nom issu de la table des tickers (repli du nom)
    /// * `history` - Résultat de la récupération de l'historique
    /// * `summary` - Résultat de la récupération des métadonnées
    pub fn format(
        &self,
        symbol: &str,
        table_name: Option<&str>,
        history: &Result<PriceSeries>,
        summary: &Result<StockSummary>,
    ) -> Vec<String> {
        let symbol = symbol.to_uppercase();

        // Pas de métadonnées : on continue avec une fiche vide
        let fallback = StockSummary::default();
        let info = match summary {
            Ok(info) => info,
            Err(e) => {
                warn!(ticker = %symbol, error = ?e, "Summary unavailable, using ticker table only");
                &fallback
            }
        };

        let mut lines = vec![String::new(), format!("Ticker: {}", symbol)];

        let name = info
            .short_name
            .as_deref()
            .or(table_name)
            .unwrap_or(MISSING);
        lines.push(format!("Name: {}", name));
        lines.push(format!("Sector: {}", info.sector_line().as_deref().unwrap_or(MISSING)));

        lines.extend(self.graph_section(info.currency(), history));
        lines.extend(self.metadata_section(info));

        debug!(ticker = %symbol, lines = lines.len(), "Report formatted");
        lines
    }

    /// Clôtures, variation et graphique ; "No graph" + message en cas d'échec
    fn graph_section(&self, currency: &str, history: &Result<PriceSeries>) -> Vec<String> {
        let rendered = history.as_ref().map_err(|e| format!("{:#}", e)).and_then(|series| {
            let change = series.percent_change().map_err(|e| e.to_string())?;
            let grid = self.renderer.render(series).map_err(|e| e.to_string())?;
            Ok((series, change, grid))
        });

        match rendered {
            Ok((series, change, grid)) => {
                let mut lines = vec![String::new()];

                // percent_change a vérifié qu'il y a au moins 2 points
                if let (Some(previous), Some(current)) = (series.previous(), series.last()) {
                    lines.push(format!(
                        "Previous Close: {} {}",
                        self.paint(&format_money(previous.close), UP_COLOR),
                        currency
                    ));
                    lines.push(format!(
                        "Current Close: {} {}",
                        self.paint(&format_money(current.close), UP_COLOR),
                        currency
                    ));
                }

                lines.push(format!(
                    "Percent Change: {} %",
                    self.paint(&short_float(change), trend_color(Trend::from_change(change)))
                ));

                lines.extend(if self.colored {
                    grid.colored_lines()
                } else {
                    grid.plain_lines()
                });
                lines
            }
            Err(message) => {
                warn!(error = %message, "No graph");
                vec!["No graph".to_string(), message]
            }
        }
    }

    /// Lignes de métadonnées, chacune avec son propre repli
    fn metadata_section(&self, info: &StockSummary) -> Vec<String> {
        let currency = info.currency();
        let money = |value: Option<f64>| or_missing(value, |v| self.paint(&format_money(v), UP_COLOR));
        let ratio = |value: Option<f64>| or_missing(value, |v| self.paint(&short_float(v), UP_COLOR));

        vec![
            String::new(),
            format!("Market Cap: {} {}", money(info.market_cap), currency),
            format!("Regular Market Volume: {}", money(info.regular_market_volume)),
            String::new(),
            format!("200 Day Average: {} {}", money(info.two_hundred_day_average), currency),
            format!("50 Day Average: {} {}", money(info.fifty_day_average), currency),
            String::new(),
            format!("Trailing P/E: {}", ratio(info.trailing_pe)),
            format!("Forward P/E: {}", ratio(info.forward_pe())),
        ]
    }

    /// Colore un texte si la couleur est activée
    fn paint(&self, text: &str, color: Color) -> String {
        if self.colored {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use crate::ui::chart::CHART_ROWS;
    use chrono::{Duration, TimeZone, Utc};

    fn series(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 21, 0, 0).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + Duration::days(i as i64), c))
            .collect();
        PriceSeries::new("AAPL".to_string(), points)
    }

    fn formatter() -> ReportFormatter {
        ReportFormatter::new(ChartRenderer::new(30), false)
    }

    fn full_summary() -> StockSummary {
        StockSummary {
            short_name: Some("Apple Inc.".to_string()),
            sector: Some("Technology".to_string()),
            industry: Some("Consumer Electronics".to_string()),
            currency: Some("USD".to_string()),
            market_cap: Some(2_950_000_000_000.0),
            regular_market_volume: Some(51_234_567.0),
            two_hundred_day_average: Some(180.456),
            fifty_day_average: Some(190.5),
            trailing_pe: Some(29.87),
            forward_pe: Some(27.5),
        }
    }

    #[test]
    fn test_full_report() {
        let lines = formatter().format(
            "aapl",
            Some("Apple Inc. Common Stock"),
            &Ok(series(&[100.0, 110.0])),
            &Ok(full_summary()),
        );

        assert_eq!(lines[1], "Ticker: AAPL");
        assert_eq!(lines[2], "Name: Apple Inc.");
        assert_eq!(lines[3], "Sector: Technology, Consumer Electronics");
        assert_eq!(lines[5], "Previous Close: 100.00 USD");
        assert_eq!(lines[6], "Current Close: 110.00 USD");
        assert_eq!(lines[7], "Percent Change: 10.0 %");

        // 8 lignes d'en-tête + 21 + 2 lignes de graphique + 9 métadonnées
        assert_eq!(lines.len(), 8 + CHART_ROWS + 2 + 9);
        assert!(lines.contains(&"Market Cap: 2,950,000,000,000.00 USD".to_string()));
        assert!(lines.contains(&"Regular Market Volume: 51,234,567.00".to_string()));
        assert!(lines.contains(&"200 Day Average: 180.46 USD".to_string()));
        assert!(lines.contains(&"50 Day Average: 190.50 USD".to_string()));
        assert!(lines.contains(&"Trailing P/E: 29.87".to_string()));
        assert!(lines.contains(&"Forward P/E: 27.5".to_string()));
    }

    #[test]
    fn test_missing_fields_use_sentinel() {
        let summary = StockSummary {
            market_cap: Some(1000.0),
            forward_pe: Some(0.0),
            ..Default::default()
        };
        let lines = formatter().format("XYZ", Some("Xyz Corp"), &Ok(series(&[1.0, 2.0])), &Ok(summary));

        assert!(lines.contains(&"Name: Xyz Corp".to_string()));
        assert!(lines.contains(&"Sector: ---".to_string()));
        assert!(lines.contains(&"Market Cap: 1,000.00 USD".to_string()));
        assert!(lines.contains(&"Regular Market Volume: ---".to_string()));
        assert!(lines.contains(&"200 Day Average: --- USD".to_string()));
        assert!(lines.contains(&"Trailing P/E: ---".to_string()));
        assert!(lines.contains(&"Forward P/E: ---".to_string()));
    }

    #[test]
    fn test_history_failure_renders_no_graph() {
        let history: Result<PriceSeries> = Err(anyhow::anyhow!("HTTP 404"));
        let lines = formatter().format("AAPL", None, &history, &Ok(full_summary()));

        let no_graph = lines.iter().position(|l| l == "No graph").unwrap();
        assert_eq!(lines[no_graph + 1], "HTTP 404");
        assert!(!lines.iter().any(|l| l.starts_with("Percent Change")));
        // Les métadonnées sont toujours là
        assert!(lines.contains(&"Forward P/E: 27.5".to_string()));
    }

    #[test]
    fn test_single_point_is_not_enough() {
        let lines = formatter().format("AAPL", None, &Ok(series(&[5.0])), &Ok(full_summary()));
        let no_graph = lines.iter().position(|l| l == "No graph").unwrap();
        assert!(lines[no_graph + 1].contains("not enough price data"));
    }

    #[test]
    fn test_zero_previous_close_renders_no_graph() {
        for closes in [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]] {
            let lines = formatter().format("AAPL", None, &Ok(series(&closes)), &Ok(full_summary()));

            let no_graph = lines.iter().position(|l| l == "No graph").unwrap();
            assert!(lines[no_graph + 1].contains("previous close is 0"));
            assert!(!lines.iter().any(|l| l.contains("inf") || l.contains("NaN")));
            assert!(lines.contains(&"Forward P/E: 27.5".to_string()));
        }
    }

    #[test]
    fn test_summary_failure_falls_back_to_table() {
        let summary: Result<StockSummary> = Err(anyhow::anyhow!("request timed out"));
        let lines = formatter().format("MSFT", Some("Microsoft"), &Ok(series(&[1.0, 1.5])), &summary);

        assert!(lines.contains(&"Name: Microsoft".to_string()));
        assert!(lines.contains(&"Sector: ---".to_string()));
        assert!(lines.contains(&"Market Cap: --- USD".to_string()));
        assert!(lines.contains(&"Percent Change: 50.0 %".to_string()));
    }

    #[test]
    fn test_declining_series_percent_change() {
        let closes: Vec<f64> = (1..=10).rev().map(|i| i as f64 * 10.0).collect();
        let lines = formatter().format("DOWN", None, &Ok(series(&closes)), &Ok(StockSummary::default()));
        assert!(lines.contains(&"Percent Change: -50.0 %".to_string()));
    }
}
