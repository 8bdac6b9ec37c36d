//! Tests for the Yahoo! Shopping source.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn product(jan: &str, buyback: u64) -> Product {
    Product {
        jan_code: Some(jan.to_string()),
        name: "SONY WH-1000XM5".to_string(),
        buyback_price: Some(buyback),
        category: Some("オーディオ".to_string()),
        ..Default::default()
    }
}

fn source_for(mock_server: &MockServer) -> YahooShopping {
    YahooShopping::with_base_url(Arc::new(HttpClient::new()), &mock_server.uri())
}

#[tokio::test]
async fn returns_median_of_validated_prices() {
    let mock_server = MockServer::start().await;

    // Buyback 30,000: 31,000 (97%) and 990,000 (3%) are rejected,
    // 500 is outside the plausible range.
    let html = r#"
        <li>送料無料 500円</li>
        <li><span>44,000円</span></li>
        <li><span>31,000円</span></li>
        <li><span>49,500 円</span></li>
        <li><span>990,000円</span></li>
        <li><span>41,800円</span></li>
    "#;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("p", "4548736132580"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server);
    let candidate = source.fetch(&product("4548736132580", 30_000)).await;

    assert_eq!(
        candidate,
        Some(PriceCandidate::new(44_000, SourceTag::Yahoo))
    );
}

#[tokio::test]
async fn no_prices_yields_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>該当する商品はありません</p>"))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server);
    assert_eq!(source.fetch(&product("4548736132580", 30_000)).await, None);
}

#[tokio::test]
async fn all_rejected_yields_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("2,980円 3,300円"))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server);
    let result = source.lookup(&product("4548736132580", 30_000)).await;
    assert!(matches!(result, Err(FetchError::Rejected(2))));
}

#[tokio::test]
async fn http_error_yields_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server);
    assert_eq!(source.fetch(&product("4548736132580", 30_000)).await, None);
}

#[tokio::test]
async fn unreachable_host_yields_none() {
    // Nothing listens on port 9 (discard) on the test host
    let source = YahooShopping::with_base_url(Arc::new(HttpClient::new()), "http://127.0.0.1:9");
    assert_eq!(source.fetch(&product("4548736132580", 30_000)).await, None);
}

#[test]
fn search_url_encodes_jan_and_trims_slash() {
    let source = YahooShopping::with_base_url(Arc::new(HttpClient::new()), "http://host/");
    assert_eq!(source.search_url("4548 736"), "http://host/search?p=4548%20736");
    assert_eq!(
        YahooShopping::new(Arc::new(HttpClient::new())).search_url("1"),
        "https://shopping.yahoo.co.jp/search?p=1"
    );
}
