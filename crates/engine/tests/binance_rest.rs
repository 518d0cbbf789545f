use chrono::Utc;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{Error, MarketDataSource, OrderRequest, OrderSide, OrderSubmitter};
use engine::BinanceFuturesClient;

const MINUTE_MS: i64 = 60_000;

/// One-minute candles for `closes`; the last one is still forming.
fn klines(closes: &[f64]) -> Value {
    let now = Utc::now().timestamp_millis();
    let n = closes.len() as i64;

    let rows: Vec<Value> = closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let i = i as i64;
            let (open, close_time) = if i == n - 1 {
                (now - MINUTE_MS / 2, now + 5 * MINUTE_MS)
            } else {
                let open = now - (n - i + 1) * MINUTE_MS;
                (open, open + MINUTE_MS - 1)
            };
            json!([
                open,
                "1.0",
                "1.0",
                "1.0",
                close.to_string(),
                "12.5",
                close_time,
                "0",
                10,
                "0",
                "0",
                "0"
            ])
        })
        .collect();
    Value::Array(rows)
}

#[tokio::test]
async fn fetch_returns_closed_candles_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fapi/v1/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1m"))
        .and(query_param("limit", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(klines(&[10.0, 11.0, 12.0, 13.0])))
        .expect(1)
        .mount(&server)
        .await;

    let client = BinanceFuturesClient::with_base_url(server.uri()).unwrap();
    let series = client.fetch("BTCUSDT", "1m", 3).await.unwrap();

    assert_eq!(series.pair, "BTCUSDT");
    assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
}

#[tokio::test]
async fn fetch_trims_to_lookback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fapi/v1/klines"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(klines(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])),
        )
        .mount(&server)
        .await;

    let client = BinanceFuturesClient::with_base_url(server.uri()).unwrap();
    let series = client.fetch("ETHUSDT", "1m", 2).await.unwrap();
    assert_eq!(series.closes(), vec![4.0, 5.0]);
}

#[tokio::test]
async fn fetch_error_status_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fapi/v1/klines"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})),
        )
        .mount(&server)
        .await;

    let client = BinanceFuturesClient::with_base_url(server.uri()).unwrap();
    let err = client.fetch("NOPE", "1m", 10).await.unwrap_err();
    match err {
        Error::Fetch { pair, reason } => {
            assert_eq!(pair, "NOPE");
            assert!(reason.contains("Invalid symbol"), "reason: {reason}");
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_signs_market_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fapi/v1/order"))
        .and(header("X-MBX-APIKEY", "test-key"))
        .and(body_string_contains("symbol=BTCUSDT"))
        .and(body_string_contains("side=BUY"))
        .and(body_string_contains("type=MARKET"))
        .and(body_string_contains("quantity=0.001"))
        .and(body_string_contains("signature="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orderId": 3_829_104_221_i64,
            "clientOrderId": "abc",
            "symbol": "BTCUSDT",
            "status": "FILLED",
            "executedQty": "0.001",
            "avgPrice": "64123.40",
            "side": "BUY",
            "type": "MARKET",
            "updateTime": 1_700_000_000_000_i64
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BinanceFuturesClient::with_base_url(server.uri())
        .unwrap()
        .with_credentials("test-key", "test-secret");
    let order = OrderRequest::market("BTCUSDT", OrderSide::Buy, 0.001);
    let confirmation = client.submit(&order).await.unwrap();

    assert_eq!(confirmation.order_id, 3_829_104_221);
    assert_eq!(confirmation.status, "FILLED");
    assert_eq!(confirmation.side, OrderSide::Buy);
    assert!((confirmation.avg_price - 64123.40).abs() < 1e-9);
    assert!((confirmation.executed_qty - 0.001).abs() < 1e-12);
}

#[tokio::test]
async fn submit_rejection_is_a_submission_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fapi/v1/order"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"code": -2019, "msg": "Margin is insufficient."})),
        )
        .mount(&server)
        .await;

    let client = BinanceFuturesClient::with_base_url(server.uri())
        .unwrap()
        .with_credentials("k", "s");
    let err = client
        .submit(&OrderRequest::market("BTCUSDT", OrderSide::Sell, 0.001))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Submission(ref m) if m.contains("Margin is insufficient")));
}

#[tokio::test]
async fn submit_without_credentials_fails_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = BinanceFuturesClient::with_base_url(server.uri()).unwrap();
    let err = client
        .submit(&OrderRequest::market("BTCUSDT", OrderSide::Buy, 0.001))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Submission(_)));
    assert!(err.to_string().contains("API key and secret are required"));
}
