use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::provider::{MarketDataProvider, ProviderFuture, ProviderId, SourceError};
use crate::{CompanyProfile, Frequency, PriceBar, PriceHistory, StatementTable, Symbol};

const REFERER: &str = "https://finance.yahoo.com/";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_ENDPOINTS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const QUERY_BASE: &str = "https://query2.finance.yahoo.com";
const PROFILE_MODULES: [&str; 3] = ["price", "assetProfile", "summaryDetail"];
/// Earliest timestamp requested from the fundamentals timeseries (mid 1985).
const TIMESERIES_START: i64 = 493_590_046;
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Timeseries type suffix and the display name of the resulting line item.
const STATEMENT_ITEMS: [(&str, &str); 7] = [
    ("TotalRevenue", "Total Revenue"),
    ("CostOfRevenue", "Cost Of Revenue"),
    ("GrossProfit", "Gross Profit"),
    ("OperatingIncome", "Operating Income"),
    ("NetIncome", "Net Income"),
    ("EBITDA", "EBITDA"),
    ("DilutedEPS", "Diluted EPS"),
];

#[derive(Debug, Clone)]
struct Crumb {
    value: String,
    fetched_at: Instant,
}

/// Cookie/crumb session for Yahoo's unofficial API.
///
/// Yahoo requires a session cookie from `fc.yahoo.com` (kept in the HTTP
/// client's cookie jar) and a crumb token passed as a query parameter.
/// The crumb is shared by every request until it expires or is invalidated.
#[derive(Debug)]
pub struct YahooAuthManager {
    crumb: Mutex<Option<Crumb>>,
    ttl: Duration,
}

impl Default for YahooAuthManager {
    fn default() -> Self {
        Self {
            crumb: Mutex::new(None),
            ttl: Duration::from_secs(60 * 60),
        }
    }
}

impl YahooAuthManager {
    /// Current crumb, refreshed when missing or older than the TTL.
    ///
    /// The lock is held across the refresh so concurrent callers wait for
    /// one handshake instead of starting their own.
    pub async fn crumb(
        &self,
        http_client: &dyn HttpClient,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            if crumb.fetched_at.elapsed() < self.ttl {
                return Ok(crumb.value.clone());
            }
        }

        let value = Self::handshake(http_client, timeout_ms).await?;
        *cached = Some(Crumb {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        tracing::debug!("refreshed yahoo crumb");
        Ok(value)
    }

    pub async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }

    async fn handshake(
        http_client: &dyn HttpClient,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        // The cookie endpoint usually answers 404; only the Set-Cookie header matters.
        let cookie_request = HttpRequest::get(COOKIE_URL)
            .with_header("referer", REFERER)
            .with_timeout_ms(timeout_ms);
        http_client.execute(cookie_request).await.map_err(|e| {
            SourceError::unavailable(format!("failed to fetch yahoo cookie: {}", e.message()))
        })?;

        for endpoint in CRUMB_ENDPOINTS {
            let request = HttpRequest::get(endpoint)
                .with_header("referer", REFERER)
                .with_timeout_ms(timeout_ms);

            let response = match http_client.execute(request).await {
                Ok(response) if response.is_success() => response,
                Ok(response) if response.status == 429 => {
                    return Err(SourceError::rate_limited(
                        "yahoo rate limited while fetching crumb",
                    ));
                }
                _ => continue,
            };

            let body = response.body.trim();
            if body.contains("<html") || body.contains("<!DOCTYPE") {
                continue;
            }
            if body.to_ascii_lowercase().contains("too many requests") {
                return Err(SourceError::rate_limited(
                    "yahoo rate limited while fetching crumb",
                ));
            }
            if !body.is_empty() && body.len() < 100 && !body.contains(char::is_whitespace) {
                return Ok(body.to_owned());
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch yahoo crumb from all endpoints",
        ))
    }
}

/// Yahoo Finance provider.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: Arc<YahooAuthManager>,
    timeout_ms: u64,
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            auth: Arc::new(YahooAuthManager::default()),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// GET `url` with the session crumb appended.
    ///
    /// A 401 or 429 invalidates the crumb and the request is retried once
    /// with a fresh one.
    async fn fetch_body(&self, url: &str, symbol: &Symbol) -> Result<String, SourceError> {
        let mut response = self.send_with_crumb(url).await?;

        if response.status == 401 || response.status == 429 {
            tracing::debug!(status = response.status, "yahoo rejected crumb; retrying once");
            self.auth.invalidate().await;
            response = self.send_with_crumb(url).await?;
        }

        match response.status {
            status if (200..300).contains(&status) => Ok(response.body),
            404 => Err(SourceError::not_found(format!(
                "no data for symbol '{symbol}'"
            ))),
            429 => Err(SourceError::rate_limited(
                "yahoo is rate limiting requests; try again later",
            )),
            status => Err(SourceError::unavailable(format!(
                "yahoo returned status {status}"
            ))),
        }
    }

    async fn send_with_crumb(&self, url: &str) -> Result<HttpResponse, SourceError> {
        let crumb = self
            .auth
            .crumb(self.http_client.as_ref(), self.timeout_ms)
            .await?;
        let request = HttpRequest::get(format!("{url}&crumb={}", urlencoding::encode(&crumb)))
            .with_header("referer", REFERER)
            .with_timeout_ms(self.timeout_ms);

        self.http_client.execute(request).await.map_err(|e| {
            if e.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            } else {
                SourceError::internal(format!("yahoo transport error: {}", e.message()))
            }
        })
    }
}

impl MarketDataProvider for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn company_profile<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, CompanyProfile> {
        Box::pin(async move {
            let url = format!(
                "{QUERY_BASE}/v10/finance/quoteSummary/{}?modules={}",
                urlencoding::encode(symbol.as_str()),
                PROFILE_MODULES.join(",")
            );
            let body = self.fetch_body(&url, symbol).await?;
            parse_company_profile(symbol, &body)
        })
    }

    fn income_statement<'a>(
        &'a self,
        symbol: &'a Symbol,
        frequency: Frequency,
    ) -> ProviderFuture<'a, StatementTable> {
        Box::pin(async move {
            let prefix = frequency.as_str();
            let types = STATEMENT_ITEMS
                .iter()
                .map(|(key, _)| format!("{prefix}{key}"))
                .collect::<Vec<_>>()
                .join(",");
            let encoded = urlencoding::encode(symbol.as_str());
            let url = format!(
                "{QUERY_BASE}/ws/fundamentals-timeseries/v1/finance/timeseries/{encoded}?symbol={encoded}&type={types}&period1={TIMESERIES_START}&period2={}",
                OffsetDateTime::now_utc().unix_timestamp()
            );
            let body = self.fetch_body(&url, symbol).await?;
            parse_statement(symbol, frequency, &body)
        })
    }

    fn weekly_price_history<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, PriceHistory> {
        Box::pin(async move {
            let url = format!(
                "{QUERY_BASE}/v8/finance/chart/{}?range=1y&interval=1wk",
                urlencoding::encode(symbol.as_str())
            );
            let body = self.fetch_body(&url, symbol).await?;
            parse_price_history(symbol, &body)
        })
    }
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooApiError {
    fn into_source_error(self, symbol: &Symbol) -> SourceError {
        let description = self.description.unwrap_or_default();
        match self.code.as_deref() {
            Some("Not Found") => SourceError::not_found(format!(
                "no data for symbol '{symbol}': {description}"
            )),
            code => SourceError::unavailable(format!(
                "yahoo API error {}: {description}",
                code.unwrap_or("unknown")
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryData,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesData,
}

#[derive(Debug, Deserialize)]
struct TimeseriesData {
    #[serde(default)]
    result: Option<Vec<TimeseriesResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResult {
    meta: TimeseriesMeta,
    #[serde(flatten)]
    series: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesMeta {
    #[serde(rename = "type", default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesPoint {
    #[serde(rename = "asOfDate")]
    as_of_date: String,
    #[serde(rename = "reportedValue", default)]
    reported_value: Option<ReportedValue>,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    #[serde(default)]
    raw: Option<f64>,
}

fn decode<T: for<'de> Deserialize<'de>>(body: &str, what: &str) -> Result<T, SourceError> {
    serde_json::from_str(body)
        .map_err(|e| SourceError::invalid_response(format!("failed to parse yahoo {what}: {e}")))
}

/// Flatten the requested quoteSummary modules into one field mapping.
fn parse_company_profile(symbol: &Symbol, body: &str) -> Result<CompanyProfile, SourceError> {
    let response: QuoteSummaryResponse = decode(body, "quote summary")?;
    if let Some(error) = response.quote_summary.error {
        return Err(error.into_source_error(symbol));
    }

    let modules = response
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::not_found(format!("no data for symbol '{symbol}'")))?;

    let mut profile = CompanyProfile::default();
    for module in PROFILE_MODULES {
        let Some(Value::Object(fields)) = modules.get(module) else {
            continue;
        };
        for (field, value) in fields {
            if profile.get(field).is_some() {
                continue;
            }
            if let Some(value) = profile_value(value) {
                profile.insert(field.clone(), value);
            }
        }
    }

    if profile.is_empty() {
        return Err(SourceError::not_found(format!(
            "no data for symbol '{symbol}'"
        )));
    }
    Ok(profile)
}

/// Scalars pass through, `{raw, fmt}` pairs collapse to `raw`, anything else is dropped.
fn profile_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null | Value::Array(_) => None,
        Value::Object(pair) => pair.get("raw").filter(|raw| !raw.is_null()).cloned(),
        scalar => Some(scalar.clone()),
    }
}

fn parse_price_history(symbol: &Symbol, body: &str) -> Result<PriceHistory, SourceError> {
    let response: ChartResponse = decode(body, "chart")?;
    if let Some(error) = response.chart.error {
        return Err(error.into_source_error(symbol));
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::not_found(format!("no data for symbol '{symbol}'")))?;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = result.meta.gmtoffset;

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (index, &timestamp) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(&quote.open, index),
            at(&quote.high, index),
            at(&quote.low, index),
            at(&quote.close, index),
        ) else {
            continue;
        };

        let local = OffsetDateTime::from_unix_timestamp(timestamp.saturating_add(offset))
            .map_err(|e| SourceError::invalid_response(format!("invalid chart timestamp: {e}")))?;

        bars.push(PriceBar {
            date: local.date(),
            open,
            high,
            low,
            close,
            volume: at(&quote.volume, index)
                .filter(|volume| *volume >= 0.0)
                .map(|volume| volume as u64),
        });
    }

    bars.sort_by_key(|bar| bar.date);
    Ok(PriceHistory::new(symbol.clone(), bars))
}

fn at(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten()
}

/// Pivot timeseries results into a statement with periods newest first.
fn parse_statement(
    symbol: &Symbol,
    frequency: Frequency,
    body: &str,
) -> Result<StatementTable, SourceError> {
    let response: TimeseriesResponse = decode(body, "fundamentals timeseries")?;
    if let Some(error) = response.timeseries.error {
        return Err(error.into_source_error(symbol));
    }

    let results = response.timeseries.result.unwrap_or_default();
    let mut columns: Vec<(&str, BTreeMap<String, Option<f64>>)> = Vec::new();
    let mut periods = BTreeSet::new();

    for (key, name) in STATEMENT_ITEMS {
        let type_key = format!("{}{key}", frequency.as_str());
        let mut points = BTreeMap::new();

        let series = results
            .iter()
            .filter(|result| result.meta.types.iter().any(|kind| *kind == type_key))
            .filter_map(|result| result.series.get(&type_key));
        for raw in series {
            let parsed: Vec<Option<TimeseriesPoint>> = serde_json::from_value(raw.clone())
                .map_err(|e| {
                    SourceError::invalid_response(format!("malformed {type_key} series: {e}"))
                })?;
            for point in parsed.into_iter().flatten() {
                let value = point.reported_value.and_then(|reported| reported.raw);
                periods.insert(point.as_of_date.clone());
                points.insert(point.as_of_date, value);
            }
        }
        columns.push((name, points));
    }

    if periods.is_empty() {
        return Err(SourceError::not_found(format!(
            "no {} financials for symbol '{symbol}'",
            frequency.as_str()
        )));
    }

    let periods = periods.into_iter().rev().collect::<Vec<_>>();
    let mut table = StatementTable::new(frequency, periods.clone());
    for (name, points) in columns {
        let values = periods
            .iter()
            .map(|period| points.get(period).copied().flatten())
            .collect();
        table = table.with_line_item(name, values);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;

    use serde_json::json;

    use super::*;
    use crate::http_client::HttpError;
    use crate::provider::SourceErrorKind;
    use crate::{NET_INCOME, TOTAL_REVENUE};

    /// Answers each request with the next scripted response for the first
    /// route whose fragment appears in the URL.
    #[derive(Debug, Default)]
    struct ScriptedHttpClient {
        routes: std::sync::Mutex<Vec<(String, VecDeque<HttpResponse>)>>,
        requests: std::sync::Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttpClient {
        fn route(self, fragment: &str, responses: Vec<HttpResponse>) -> Self {
            self.routes
                .lock()
                .expect("routes lock")
                .push((fragment.to_owned(), responses.into()));
            self
        }

        fn with_session(self, crumb: &str) -> Self {
            self.route("fc.yahoo.com", vec![HttpResponse::new(404, ""); 4])
                .route("getcrumb", vec![HttpResponse::ok_json(crumb); 4])
        }

        fn urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .expect("requests lock")
                .iter()
                .map(|request| request.url.clone())
                .collect()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            let response = self
                .routes
                .lock()
                .expect("routes lock")
                .iter_mut()
                .find(|(fragment, _)| request.url.contains(fragment.as_str()))
                .and_then(|(_, responses)| responses.pop_front())
                .ok_or_else(|| HttpError::non_retryable(format!("unscripted {}", request.url)));
            self.requests.lock().expect("requests lock").push(request);
            Box::pin(async move { response })
        }
    }

    fn symbol(text: &str) -> Symbol {
        Symbol::parse(text).expect("valid symbol")
    }

    #[tokio::test]
    async fn company_profile_flattens_modules_in_order() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "price": {
                        "longName": "Apple Inc.",
                        "marketCap": { "raw": 3_000_000_000_000_u64, "fmt": "3T" },
                        "currency": "USD"
                    },
                    "assetProfile": {
                        "sector": "Technology",
                        "currency": "EUR",
                        "companyOfficers": [],
                        "fullTimeEmployees": 161000
                    },
                    "summaryDetail": { "dividendYield": {} }
                }],
                "error": null
            }
        });
        let client = Arc::new(
            ScriptedHttpClient::default()
                .with_session("crumb-1")
                .route("quoteSummary", vec![HttpResponse::ok_json(body.to_string())]),
        );
        let adapter = YahooAdapter::new(client.clone());

        let profile = adapter
            .company_profile(&symbol("AAPL"))
            .await
            .expect("profile");
        let info = profile.project().expect("complete profile");

        assert_eq!(info.long_name, "Apple Inc.");
        assert_eq!(info.market_cap, 3_000_000_000_000);
        assert_eq!(info.sector, "Technology");
        assert_eq!(info.currency.as_deref(), Some("USD"));
        assert_eq!(info.full_time_employees, Some(161_000));
        assert!(profile.get("companyOfficers").is_none());
        assert!(profile.get("dividendYield").is_none());

        let urls = client.urls();
        let expected = "quoteSummary/AAPL?modules=price,assetProfile,summaryDetail&crumb=crumb-1";
        assert!(urls.iter().any(|url| url.contains(expected)));
    }

    #[tokio::test]
    async fn unknown_symbol_maps_to_not_found() {
        let body = json!({
            "quoteSummary": {
                "result": null,
                "error": { "code": "Not Found", "description": "Quote not found for symbol: ZZZZ" }
            }
        });
        let client = Arc::new(
            ScriptedHttpClient::default()
                .with_session("crumb-1")
                .route("quoteSummary", vec![HttpResponse::new(404, body.to_string())]),
        );
        let adapter = YahooAdapter::new(client);

        let error = adapter
            .company_profile(&symbol("ZZZZ"))
            .await
            .expect_err("unknown symbol");

        assert_eq!(error.kind(), SourceErrorKind::NotFound);
        assert!(error.message().contains("ZZZZ"));
    }

    #[tokio::test]
    async fn rejected_crumb_is_refreshed_and_retried_once() {
        let chart = json!({
            "chart": {
                "result": [{
                    "meta": { "gmtoffset": 0 },
                    "timestamp": [1_704_067_200],
                    "indicators": { "quote": [{
                        "open": [1.0], "high": [2.0], "low": [0.5], "close": [1.5], "volume": [100]
                    }] }
                }],
                "error": null
            }
        });
        let client = Arc::new(
            ScriptedHttpClient::default()
                .route("fc.yahoo.com", vec![HttpResponse::new(404, ""); 2])
                .route(
                    "getcrumb",
                    vec![HttpResponse::ok_json("stale"), HttpResponse::ok_json("fresh")],
                )
                .route(
                    "/v8/finance/chart/",
                    vec![
                        HttpResponse::new(401, "Unauthorized"),
                        HttpResponse::ok_json(chart.to_string()),
                    ],
                ),
        );
        let adapter = YahooAdapter::new(client.clone());

        let history = adapter
            .weekly_price_history(&symbol("MSFT"))
            .await
            .expect("retry succeeds");

        assert_eq!(history.len(), 1);
        let chart_urls = client
            .urls()
            .into_iter()
            .filter(|url| url.contains("/v8/finance/chart/"))
            .collect::<Vec<_>>();
        assert_eq!(chart_urls.len(), 2);
        assert!(chart_urls[0].ends_with("crumb=stale"));
        assert!(chart_urls[1].ends_with("crumb=fresh"));
    }

    #[tokio::test]
    async fn persistent_rate_limit_is_reported() {
        let client = Arc::new(
            ScriptedHttpClient::default()
                .with_session("crumb-1")
                .route("/v8/finance/chart/", vec![HttpResponse::new(429, ""); 2]),
        );
        let adapter = YahooAdapter::new(client);

        let error = adapter
            .weekly_price_history(&symbol("AAPL"))
            .await
            .expect_err("rate limited");

        assert_eq!(error.kind(), SourceErrorKind::RateLimited);
        assert!(error.retryable());
    }

    #[test]
    fn chart_dates_use_exchange_offset_and_skip_gaps() {
        // 2024-01-08 04:00 UTC is still 2024-01-07 in New York (UTC-5).
        let body = json!({
            "chart": {
                "result": [{
                    "meta": { "gmtoffset": -18_000 },
                    "timestamp": [1_704_686_400, 1_705_291_200, 1_705_896_000],
                    "indicators": { "quote": [{
                        "open": [185.0, null, 190.0],
                        "high": [188.0, 189.0, 193.0],
                        "low": [183.0, 184.0, 189.0],
                        "close": [186.0, 187.0, 192.0],
                        "volume": [1000, 2000, null]
                    }] }
                }],
                "error": null
            }
        })
        .to_string();

        let history = parse_price_history(&symbol("AAPL"), &body).expect("chart parses");

        assert_eq!(history.len(), 2);
        assert_eq!(history.bars[0].date, time::macros::date!(2024 - 01 - 07));
        assert_eq!(history.bars[0].volume, Some(1000));
        assert_eq!(history.bars[1].open, 190.0);
        assert_eq!(history.bars[1].volume, None);
    }

    #[test]
    fn statement_periods_are_newest_first_with_gaps() {
        let body = json!({
            "timeseries": {
                "result": [
                    {
                        "meta": { "symbol": ["AAPL"], "type": ["annualTotalRevenue"] },
                        "annualTotalRevenue": [
                            { "asOfDate": "2022-09-30", "reportedValue": { "raw": 394.3, "fmt": "394.3" } },
                            { "asOfDate": "2023-09-30", "reportedValue": { "raw": 383.3, "fmt": "383.3" } }
                        ]
                    },
                    {
                        "meta": { "symbol": ["AAPL"], "type": ["annualNetIncome"] },
                        "annualNetIncome": [
                            null,
                            { "asOfDate": "2023-09-30", "reportedValue": { "raw": 97.0, "fmt": "97.0" } }
                        ]
                    },
                    { "meta": { "symbol": ["AAPL"], "type": ["annualEBITDA"] } }
                ],
                "error": null
            }
        })
        .to_string();

        let table = parse_statement(&symbol("AAPL"), Frequency::Annual, &body).expect("parses");

        assert_eq!(table.periods, vec!["2023-09-30", "2022-09-30"]);
        assert_eq!(table.line_items.len(), STATEMENT_ITEMS.len());
        let rows = table.transpose();
        assert_eq!(rows[0].total_revenue(), Some(383.3));
        assert_eq!(rows[0].net_income(), Some(97.0));
        assert_eq!(rows[1].value(TOTAL_REVENUE), Some(394.3));
        assert_eq!(rows[1].value(NET_INCOME), None);
        assert_eq!(rows[1].value("EBITDA"), None);
    }

    #[test]
    fn empty_timeseries_is_not_found() {
        let body = json!({ "timeseries": { "result": [], "error": null } }).to_string();

        let error = parse_statement(&symbol("ZZZZ"), Frequency::Quarterly, &body)
            .expect_err("no series");

        assert_eq!(error.kind(), SourceErrorKind::NotFound);
        assert_eq!(error.message(), "no quarterly financials for symbol 'ZZZZ'");
    }

    #[test]
    fn malformed_body_is_invalid_response() {
        let error = parse_company_profile(&symbol("AAPL"), "<html>").expect_err("not json");
        assert_eq!(error.kind(), SourceErrorKind::InvalidResponse);
    }
}
