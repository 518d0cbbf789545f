use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use tracing::debug;

use common::{
    Error, MarketDataSource, OrderConfirmation, OrderRequest, OrderSubmitter, PricePoint,
    PriceSeries, Result,
};

pub const MAINNET_URL: &str = "https://fapi.binance.com";
pub const TESTNET_URL: &str = "https://testnet.binancefuture.com";

const RECV_WINDOW_MS: u64 = 5_000;

struct Credentials {
    api_key: String,
    secret: String,
}

/// REST client for Binance USDⓈ-M futures.
///
/// Klines are public, so a client without credentials can still serve as a
/// `MarketDataSource`. Order submission requires an API key and secret.
pub struct BinanceFuturesClient {
    base_url: String,
    credentials: Option<Credentials>,
    http: Client,
}

impl BinanceFuturesClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(MAINNET_URL)
    }

    /// Point the client at another host (testnet, or a mock server in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: None,
            http,
        })
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            api_key: api_key.into(),
            secret: secret.into(),
        });
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn timestamp_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    fn sign(secret: &str, query: &str) -> String {
        type HmacSha256 = Hmac<Sha256>;
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    async fn signed_post(&self, path: &str, params: &str) -> Result<String> {
        let creds = self.credentials.as_ref().ok_or_else(|| {
            Error::Config("Binance API key and secret are required to submit orders".into())
        })?;

        let ts = Self::timestamp_ms();
        let query = format!("{params}&recvWindow={RECV_WINDOW_MS}&timestamp={ts}");
        let signature = Self::sign(&creds.secret, &query);
        let body = format!("{query}&signature={signature}");
        let url = format!("{}{path}", self.base_url);

        let resp = self
            .http
            .post(&url)
            .header("X-MBX-APIKEY", &creds.api_key)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Exchange(format!("HTTP {status}: {text}")));
        }
        Ok(text)
    }

    async fn klines(&self, pair: &str, interval: &str, limit: usize) -> Result<String> {
        let url = format!("{}/fapi/v1/klines", self.base_url);
        let limit = limit.to_string();

        let resp = self
            .http
            .get(&url)
            .query(&[("symbol", pair), ("interval", interval), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Exchange(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl MarketDataSource for BinanceFuturesClient {
    async fn fetch(&self, pair: &str, interval: &str, lookback: usize) -> Result<PriceSeries> {
        debug!(pair = %pair, interval = %interval, lookback, "Fetching klines");

        // One extra row covers the candle that is still forming.
        let body = self
            .klines(pair, interval, lookback + 1)
            .await
            .map_err(|e| Error::fetch(pair, e))?;

        parse_klines(pair, &body, lookback, Self::timestamp_ms()).map_err(|e| Error::fetch(pair, e))
    }
}

#[async_trait]
impl OrderSubmitter for BinanceFuturesClient {
    async fn submit(&self, order: &OrderRequest) -> Result<OrderConfirmation> {
        let params = format!(
            "symbol={}&side={}&type=MARKET&quantity={}&newClientOrderId={}&newOrderRespType=RESULT",
            order.pair, order.side, order.quantity, order.id
        );

        debug!(pair = %order.pair, side = %order.side, qty = order.quantity, "Submitting order to Binance");
        let body = self
            .signed_post("/fapi/v1/order", &params)
            .await
            .map_err(|e| Error::Submission(e.to_string()))?;

        let resp: OrderResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Submission(format!("malformed order response: {e}")))?;

        Ok(OrderConfirmation {
            order_id: resp.order_id,
            client_order_id: resp.client_order_id,
            pair: order.pair.clone(),
            side: order.side,
            status: resp.status,
            executed_qty: resp.executed_qty.parse().unwrap_or(0.0),
            avg_price: resp.avg_price.parse().unwrap_or(0.0),
            timestamp: resp
                .update_time
                .and_then(DateTime::from_timestamp_millis)
                .unwrap_or_else(Utc::now),
        })
    }
}

// ─── Kline parsing ────────────────────────────────────────────────────────────

/// Parse a klines payload into at most `lookback` closed candles.
///
/// Each row is `[openTime, open, high, low, close, volume, closeTime, ...]`
/// with prices as strings. Rows whose close time is not yet past `now_ms`
/// belong to the candle still forming and are dropped.
fn parse_klines(pair: &str, body: &str, lookback: usize, now_ms: i64) -> Result<PriceSeries> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)?;

    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        let (open_time, close, close_time) = match (row.first(), row.get(4), row.get(6)) {
            (Some(o), Some(c), Some(ct)) => (o, c, ct),
            _ => return Err(Error::Exchange(format!("short kline row: {row:?}"))),
        };

        let close_time_ms = close_time
            .as_i64()
            .ok_or_else(|| Error::Exchange(format!("bad kline close time: {close_time}")))?;
        if close_time_ms >= now_ms {
            continue;
        }

        let open_time = open_time
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| Error::Exchange(format!("bad kline open time: {open_time}")))?;
        let close = close
            .as_str()
            .and_then(|c| c.parse::<f64>().ok())
            .ok_or_else(|| Error::Exchange(format!("bad kline close price: {close}")))?;

        points.push(PricePoint { open_time, close });
    }

    let series = PriceSeries::new(pair, points);
    let skip = series.len().saturating_sub(lookback);
    Ok(PriceSeries::new(pair, series.points()[skip..].to_vec()))
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderResponse {
    order_id: i64,
    client_order_id: String,
    status: String,
    #[serde(default)]
    executed_qty: String,
    #[serde(default)]
    avg_price: String,
    #[serde(default)]
    update_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(open_ms: i64, close: &str) -> String {
        format!(
            r#"[{open_ms},"1.0","2.0","0.5","{close}","10.0",{},"0",5,"0","0","0"]"#,
            open_ms + 59_999
        )
    }

    #[test]
    fn drops_forming_candle_and_trims_to_lookback() {
        let body = format!(
            "[{},{},{},{}]",
            row(0, "10.0"),
            row(60_000, "11.0"),
            row(120_000, "12.0"),
            row(180_000, "13.0")
        );
        // now falls inside the last candle
        let series = parse_klines("BTCUSDT", &body, 2, 200_000).unwrap();
        assert_eq!(series.closes(), vec![11.0, 12.0]);
        assert_eq!(series.pair, "BTCUSDT");
    }

    #[test]
    fn short_history_is_returned_as_is() {
        let body = format!("[{}]", row(0, "10.5"));
        let series = parse_klines("NEWUSDT", &body, 100, 1_000_000).unwrap();
        assert_eq!(series.closes(), vec![10.5]);
    }

    #[test]
    fn malformed_rows_are_errors() {
        assert!(parse_klines("BTCUSDT", r#"[[1,"2"]]"#, 10, 0).is_err());
        assert!(parse_klines("BTCUSDT", r#"{"code":-1121}"#, 10, 0).is_err());
        let bad_price = r#"[[0,"1","1","1","abc","1",59999]]"#;
        assert!(parse_klines("BTCUSDT", bad_price, 10, 1_000_000).is_err());
    }

    #[test]
    fn signature_matches_binance_reference() {
        // Example from the Binance API documentation.
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            BinanceFuturesClient::sign(secret, query),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }
}
