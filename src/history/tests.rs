//! Tests for the history module

use super::*;
use crate::error::Error;
use crate::http::HttpClientConfig;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fetcher(server: &MockServer) -> HistoryFetcher {
    let client =
        HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap();
    let base = QueryParameters::new()
        .with("fields1", "f1,f2")
        .with("fields2", "f51,f52,f53");
    HistoryFetcher::new(
        client,
        format!("{}/api/qt/stock/kline/get", server.uri()),
        Method::POST,
        base,
        KlineDecoder::new(
            "data.klines",
            vec!["date".into(), "open".into(), "close".into()],
        ),
    )
}

#[test_case("600000", "1.600000" ; "shanghai")]
#[test_case("000001", "0.000001" ; "shenzhen")]
#[test_case("300750", "0.300750" ; "chinext")]
#[test_case("830799", "0.830799" ; "beijing")]
fn test_secid(symbol: &str, expected: &str) {
    assert_eq!(HistoryRequest::new(symbol).secid(), expected);
}

#[test_case(Period::Daily, 101)]
#[test_case(Period::Weekly, 102)]
#[test_case(Period::Monthly, 103)]
fn test_period_code(period: Period, code: u32) {
    assert_eq!(period.code(), code);
}

#[test_case(Adjust::None, 0)]
#[test_case(Adjust::Qfq, 1)]
#[test_case(Adjust::Hfq, 2)]
fn test_adjust_code(adjust: Adjust, code: u32) {
    assert_eq!(adjust.code(), code);
}

#[test]
fn test_parse_period_and_adjust() {
    assert_eq!("Weekly".parse::<Period>().unwrap(), Period::Weekly);
    assert_eq!("".parse::<Adjust>().unwrap(), Adjust::None);
    assert_eq!("hfq".parse::<Adjust>().unwrap(), Adjust::Hfq);
    assert!("hourly".parse::<Period>().is_err());
    assert!("xfq".parse::<Adjust>().is_err());
}

#[test]
fn test_parse_date_formats() {
    assert_eq!(parse_date("20240105").unwrap(), date(2024, 1, 5));
    assert_eq!(parse_date("2024-01-05").unwrap(), date(2024, 1, 5));
    assert!(parse_date("05/01/2024").is_err());
}

#[test]
fn test_to_params() {
    let request = HistoryRequest::new("600000")
        .with_period(Period::Monthly)
        .with_adjust(Adjust::Qfq)
        .with_range(date(2024, 1, 1), date(2024, 6, 30));
    let params = request.to_params(&QueryParameters::new().with("ut", "abc"));

    let pairs = params.to_pairs();
    assert!(pairs.contains(&("secid".to_string(), "1.600000".to_string())));
    assert!(pairs.contains(&("klt".to_string(), "103".to_string())));
    assert!(pairs.contains(&("fqt".to_string(), "1".to_string())));
    assert!(pairs.contains(&("beg".to_string(), "20240101".to_string())));
    assert!(pairs.contains(&("end".to_string(), "20240630".to_string())));
    assert!(pairs.contains(&("ut".to_string(), "abc".to_string())));
}

#[test]
fn test_validate() {
    assert!(HistoryRequest::new("600000").validate().is_ok());
    assert!(HistoryRequest::new("  ").validate().is_err());

    let reversed = HistoryRequest::new("600000").with_range(date(2024, 2, 1), date(2024, 1, 1));
    assert!(matches!(
        reversed.validate().unwrap_err(),
        Error::InvalidConfigValue { .. }
    ));
}

#[tokio::test]
async fn test_fetch_decodes_and_tags_symbol() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/qt/stock/kline/get"))
        .and(body_string_contains("secid=0.000001"))
        .and(body_string_contains("klt=102"))
        .and(body_string_contains("fqt=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "code": "000001",
                "klines": ["2024-01-05,9.30,9.41", "2024-01-12,9.41,9.12"]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = HistoryRequest::new("000001")
        .with_period(Period::Weekly)
        .with_adjust(Adjust::Hfq);
    let records = fetcher(&server)
        .fetch(&request, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["date"], "2024-01-05");
    assert_eq!(records[1]["close"], "9.12");
    assert!(records.iter().all(|r| r[SYMBOL_FIELD] == "000001"));
}

#[tokio::test]
async fn test_fetch_null_data_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rc": 0, "data": null})))
        .mount(&server)
        .await;

    let records = fetcher(&server)
        .fetch(&HistoryRequest::new("999999"), Duration::from_secs(5))
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_fetch_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = fetcher(&server)
        .fetch(&HistoryRequest::new("600000"), Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
}

#[tokio::test]
async fn test_fetch_invalid_request_skips_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = fetcher(&server)
        .fetch(&HistoryRequest::new(""), Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}
