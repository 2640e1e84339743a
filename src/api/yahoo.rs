// ============================================================================
// API Client : Yahoo Finance
// ============================================================================
// Récupère l'historique des clôtures et les métadonnées depuis Yahoo Finance
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : requêtes HTTP non-bloquantes (reqwest)
// 2. Async dans sync : le provider possède un runtime tokio et fait block_on
//    (la boucle interactive est synchrone)
// 3. Serde : désérialisation JSON automatique
//
// AUTHENTIFICATION quoteSummary :
// - Yahoo exige un cookie de session + un jeton "crumb" sur quoteSummary
// - Le cookie est posé par fc.yahoo.com (client avec cookie store)
// - Le crumb est demandé une fois, mis en cache, et renouvelé sur 401/403
// ============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Deserialize;
use reqwest::StatusCode;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::api::provider::MarketDataProvider;
use crate::models::{PricePoint, PriceSeries, StockSummary};

/// Endpoint de l'historique (chart v8)
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Endpoint des métadonnées (quoteSummary v10)
const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// Page qui pose le cookie de session Yahoo
const COOKIE_URL: &str = "https://fc.yahoo.com";

/// Endpoint du jeton crumb (nécessite le cookie)
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";

/// Modules quoteSummary demandés
const SUMMARY_MODULES: &str = "price,summaryDetail,assetProfile";

/// User-Agent pour éviter le blocage par Yahoo
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Timeout d'une requête
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Structures pour parser la réponse chart
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

/// Seules les clôtures nous intéressent
#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

// ============================================================================
// Structures pour parser la réponse quoteSummary
// ============================================================================
// Les nombres arrivent sous la forme { "raw": 123.4, "fmt": "123.40" },
// parfois {} ou "raw": "Infinity" : on lit raw comme une Value et on garde
// uniquement les nombres
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<SummaryResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    summary_detail: Option<SummaryDetail>,
    #[serde(default)]
    asset_profile: Option<AssetProfile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    short_name: Option<String>,
    currency: Option<String>,
    market_cap: Option<RawNumber>,
    regular_market_volume: Option<RawNumber>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    fifty_day_average: Option<RawNumber>,
    two_hundred_day_average: Option<RawNumber>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawNumber>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawNumber>,
    market_cap: Option<RawNumber>,
    volume: Option<RawNumber>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawNumber {
    #[serde(default)]
    raw: Option<serde_json::Value>,
}

impl RawNumber {
    fn value(&self) -> Option<f64> {
        self.raw.as_ref().and_then(|v| v.as_f64()).filter(|v| v.is_finite())
    }
}

/// CONCEPT RUST : Option<&T> → Option<f64> avec and_then
fn raw(number: &Option<RawNumber>) -> Option<f64> {
    number.as_ref().and_then(RawNumber::value)
}

// ============================================================================
// YahooProvider
// ============================================================================

/// Client Yahoo Finance synchrone
///
/// CONCEPT RUST : Ownership d'un runtime
/// - Le runtime vit aussi longtemps que le provider
/// - Chaque appel public fait un block_on sur la version async
pub struct YahooProvider {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,

    /// Crumb en cache (None = à redemander)
    crumb_cache: Mutex<Option<String>>,
}

impl YahooProvider {
    /// Crée le client HTTP et le runtime tokio
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Échec de la création du client HTTP")?;

        let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

        Ok(Self {
            client,
            runtime,
            crumb_cache: Mutex::new(None),
        })
    }

    /// Récupère l'historique des clôtures
    ///
    /// La période demandée est `days * 2` jours calendaires, ce qui donne au
    /// plus 120 séances pour 60 jours.
    #[instrument(skip(self))]
    async fn fetch_history_async(&self, symbol: &str, days: u32) -> Result<PriceSeries> {
        let url = build_chart_url(symbol, days);
        debug!(url = %url, "Built Yahoo Finance chart URL");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Échec de la requête HTTP vers Yahoo Finance")?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");
        if !status.is_success() {
            error!(status = %status, "Yahoo Finance returned error status");
            anyhow::bail!("Yahoo Finance a retourné une erreur : HTTP {}", status);
        }

        let body: ChartResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse Yahoo")?;

        let series = parse_chart_response(body, symbol)?;
        info!(points = series.len(), "Successfully fetched price history");
        Ok(series)
    }

    /// Obtient le crumb, depuis le cache ou auprès de Yahoo
    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb_cache.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // fc.yahoo.com répond souvent 404 mais pose quand même le cookie
        if let Err(e) = self.client.get(COOKIE_URL).send().await {
            warn!(error = ?e, "Cookie request failed, trying crumb anyway");
        }

        let response = self
            .client
            .get(CRUMB_URL)
            .send()
            .await
            .context("Échec de la requête du crumb Yahoo")?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Yahoo Finance refused crumb request");
            anyhow::bail!("Crumb Yahoo refusé : HTTP {}", status);
        }

        let body = response.text().await.context("Échec de la lecture du crumb")?;
        let crumb = parse_crumb(&body)?;
        debug!("Obtained Yahoo crumb");

        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    /// Récupère les métadonnées (nom, secteur, capitalisation, P/E)
    ///
    /// Un 401/403 invalide le crumb en cache et relance une fois.
    #[instrument(skip(self))]
    async fn fetch_summary_async(&self, symbol: &str) -> Result<StockSummary> {
        let url = build_summary_url(symbol);
        debug!(url = %url, "Built Yahoo Finance quoteSummary URL");

        let mut retried = false;
        let response = loop {
            let crumb = self.crumb().await?;
            let response = self
                .client
                .get(&url)
                .query(&[("crumb", crumb.as_str())])
                .send()
                .await
                .context("Échec de la requête HTTP vers Yahoo Finance")?;

            let status = response.status();
            let unauthorized = status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN;
            if unauthorized && !retried {
                warn!(status = %status, "Crumb rejected, requesting a new one");
                *self.crumb_cache.lock().await = None;
                retried = true;
                continue;
            }
            break response;
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Yahoo Finance refused summary request");
            anyhow::bail!("Yahoo Finance a retourné une erreur : HTTP {}", status);
        }

        let body: SummaryResponse = response
            .json()
            .await
            .context("Échec du parsing JSON des métadonnées Yahoo")?;

        let summary = parse_summary_response(body)?;
        info!("Successfully fetched summary");
        Ok(summary)
    }
}

impl MarketDataProvider for YahooProvider {
    fn fetch_history(&self, symbol: &str, days: u32) -> Result<PriceSeries> {
        self.runtime.block_on(self.fetch_history_async(symbol, days))
    }

    fn fetch_summary(&self, symbol: &str) -> Result<StockSummary> {
        self.runtime.block_on(self.fetch_summary_async(symbol))
    }
}

// ============================================================================
// Construction des URLs et parsing
// ============================================================================

fn build_chart_url(symbol: &str, days: u32) -> String {
    format!(
        "{}/{}?range={}d&interval=1d",
        CHART_URL,
        symbol.to_uppercase(),
        days * 2
    )
}

fn build_summary_url(symbol: &str) -> String {
    format!(
        "{}/{}?modules={}",
        SUMMARY_URL,
        symbol.to_uppercase(),
        SUMMARY_MODULES
    )
}

/// Valide le corps de la réponse getcrumb
///
/// Yahoo renvoie le jeton en texte brut ; une page HTML ou un corps vide
/// signifie que le cookie n'a pas été accepté.
fn parse_crumb(body: &str) -> Result<String> {
    let crumb = body.trim();
    if crumb.is_empty() || crumb.contains('<') || crumb.contains(char::is_whitespace) {
        anyhow::bail!("Crumb Yahoo invalide");
    }
    Ok(crumb.to_string())
}

/// Convertit la réponse chart en PriceSeries (points sans clôture ignorés)
fn parse_chart_response(response: ChartResponse, symbol: &str) -> Result<PriceSeries> {
    if let Some(err) = response.chart.error {
        anyhow::bail!("{}: {}", err.code, err.description);
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .context("Aucune donnée retournée par Yahoo Finance")?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();

    let mut points = Vec::with_capacity(timestamps.len());
    let mut skipped = 0;
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let close = match closes.get(i).copied().flatten() {
            Some(close) => close,
            None => {
                skipped += 1;
                continue;
            }
        };
        let datetime = DateTime::from_timestamp(timestamp, 0).context("Timestamp invalide")?;
        points.push(PricePoint::new(datetime, close));
    }

    if skipped > 0 {
        warn!(skipped, total = timestamps.len(), "Skipped points with missing close");
    }

    if points.is_empty() {
        anyhow::bail!("Aucun prix de clôture valide trouvé pour {}", symbol);
    }

    Ok(PriceSeries::new(symbol.to_uppercase(), points))
}

/// Convertit la réponse quoteSummary en StockSummary
fn parse_summary_response(response: SummaryResponse) -> Result<StockSummary> {
    if let Some(err) = response.quote_summary.error {
        anyhow::bail!("{}: {}", err.code, err.description);
    }

    let result = response
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .context("Aucune métadonnée retournée par Yahoo Finance")?;

    let price = result.price.unwrap_or_default();
    let detail = result.summary_detail.unwrap_or_default();
    let profile = result.asset_profile.unwrap_or_default();

    Ok(StockSummary {
        short_name: price.short_name,
        sector: profile.sector,
        industry: profile.industry,
        currency: price.currency,
        market_cap: raw(&price.market_cap).or_else(|| raw(&detail.market_cap)),
        regular_market_volume: raw(&price.regular_market_volume).or_else(|| raw(&detail.volume)),
        two_hundred_day_average: raw(&detail.two_hundred_day_average),
        fifty_day_average: raw(&detail.fifty_day_average),
        trailing_pe: raw(&detail.trailing_pe),
        forward_pe: raw(&detail.forward_pe),
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_urls() {
        let url = build_chart_url("aapl", 30);
        assert!(url.contains("/AAPL?"));
        assert!(url.contains("range=60d"));
        assert!(url.contains("interval=1d"));

        let url = build_summary_url("msft");
        assert!(url.contains("quoteSummary/MSFT"));
        assert!(url.contains("assetProfile"));
    }

    #[test]
    fn test_parse_crumb() {
        assert_eq!(parse_crumb("Ab1/cD.2xYz\n").unwrap(), "Ab1/cD.2xYz");
        assert!(parse_crumb("").is_err());
        assert!(parse_crumb("   ").is_err());
        assert!(parse_crumb("<html><body>Too Many Requests</body></html>").is_err());
        assert!(parse_crumb("Too Many Requests").is_err());
    }

    #[test]
    fn test_parse_chart_response() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": { "symbol": "AAPL" },
                    "timestamp": [1704204000, 1704290400, 1704376800],
                    "indicators": { "quote": [{ "close": [185.64, null, 181.91] }] }
                }],
                "error": null
            }
        }"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let series = parse_chart_response(response, "aapl").unwrap();

        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.closes(), vec![185.64, 181.91]);
    }

    #[test]
    fn test_parse_chart_error() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let err = parse_chart_response(response, "ZZZZZZ").unwrap_err();
        assert!(err.to_string().contains("delisted"));
    }

    #[test]
    fn test_parse_summary_response() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {
                        "shortName": "Apple Inc.",
                        "currency": "USD",
                        "marketCap": { "raw": 2950000000000, "fmt": "2.95T" },
                        "regularMarketVolume": { "raw": 51234567, "fmt": "51.23M" }
                    },
                    "summaryDetail": {
                        "fiftyDayAverage": { "raw": 190.5, "fmt": "190.50" },
                        "twoHundredDayAverage": { "raw": 180.4, "fmt": "180.40" },
                        "trailingPE": { "raw": "Infinity", "fmt": "∞" },
                        "forwardPE": {}
                    },
                    "assetProfile": { "sector": "Technology", "industry": "Consumer Electronics" }
                }],
                "error": null
            }
        }"#;
        let response: SummaryResponse = serde_json::from_str(json).unwrap();
        let summary = parse_summary_response(response).unwrap();

        assert_eq!(summary.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(summary.market_cap, Some(2_950_000_000_000.0));
        assert_eq!(summary.regular_market_volume, Some(51_234_567.0));
        assert_eq!(summary.fifty_day_average, Some(190.5));
        assert_eq!(summary.trailing_pe, None);
        assert_eq!(summary.forward_pe, None);
        assert_eq!(summary.sector.as_deref(), Some("Technology"));
    }

    #[test]
    fn test_parse_summary_missing_modules() {
        let json = r#"{ "quoteSummary": { "result": [{}], "error": null } }"#;
        let response: SummaryResponse = serde_json::from_str(json).unwrap();
        let summary = parse_summary_response(response).unwrap();
        assert_eq!(summary, StockSummary::default());
    }

    // Test avec un vrai appel API (peut échouer si pas de connexion)
    #[test]
    fn test_fetch_history_live() {
        let provider = match YahooProvider::new() {
            Ok(provider) => provider,
            Err(e) => {
                println!("⚠ Test skippé (runtime indisponible) : {}", e);
                return;
            }
        };

        match provider.fetch_history("AAPL", 5) {
            Ok(series) => {
                assert_eq!(series.symbol, "AAPL");
                assert!(!series.is_empty());
                println!("✓ Récupéré {} clôtures pour AAPL", series.len());
            }
            Err(e) => {
                println!("⚠ Test skippé (pas de connexion?) : {}", e);
            }
        }
    }

    // Crumb + quoteSummary réels (peut échouer si pas de connexion)
    #[test]
    fn test_fetch_summary_live() {
        let provider = match YahooProvider::new() {
            Ok(provider) => provider,
            Err(e) => {
                println!("⚠ Test skippé (runtime indisponible) : {}", e);
                return;
            }
        };

        match provider.fetch_summary("AAPL") {
            Ok(summary) => {
                assert!(summary.short_name.is_some());
                println!("✓ Métadonnées AAPL : {:?}", summary.short_name);
            }
            Err(e) => {
                println!("⚠ Test skippé (pas de connexion?) : {}", e);
            }
        }
    }
}
