// tests/lookup.rs
//
// Lookups against a local server standing in for tiobe.com.
//
use std::fs;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use tiobe::{ScraperError, WebScraper};
use tokio::net::TcpListener;

const THREE_LANGUAGES: &str = r#"<html><body>
<table id="top20"><tbody>
<tr><td>1</td><td>1</td><td></td><td></td><td>C</td><td>17.50%</td><td>2.10%</td></tr>
<tr><td>2</td><td>2</td><td></td><td></td><td>Python</td><td>15.16%</td><td>1.50%</td></tr>
<tr><td>3</td><td>3</td><td></td><td></td><td>Go</td><td>2.05%</td><td>-0.10%</td></tr>
</tbody></table>
</body></html>"#;

async fn serve(router: Router) -> WebScraper {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move { axum::serve(listener, router).await });

    WebScraper::with_base_url(format!("http://{addr}")).expect("Failed to build scraper")
}

fn index_page(body: String) -> Router {
    Router::new().route(
        "/tiobe-index/",
        get(move || {
            let body = body.clone();
            async move { Html(body) }
        }),
    )
}

#[tokio::test]
async fn find_language_end_to_end() {
    let scraper = serve(index_page(THREE_LANGUAGES.to_string())).await;

    let go = scraper.find_language("go").await.expect("Go should be found");
    assert_eq!(go.rank(), 3);
    assert_eq!(go.name(), "Go");
    assert_eq!(go.rating(), 2.05);
    assert_eq!(go.change(), -0.10);
}

#[tokio::test]
async fn find_language_is_case_insensitive() {
    let scraper = serve(index_page(THREE_LANGUAGES.to_string())).await;

    let lower = scraper.find_language("python").await.expect("lowercase");
    let title = scraper.find_language("Python").await.expect("title case");
    let upper = scraper.find_language("PYTHON").await.expect("uppercase");

    assert_eq!(lower, title);
    assert_eq!(title, upper);
    assert_eq!(upper.rank(), 2);
}

#[tokio::test]
async fn find_language_not_found() {
    let scraper = serve(index_page(THREE_LANGUAGES.to_string())).await;

    let err = scraper
        .find_language("Rust")
        .await
        .expect_err("Rust is not in the table");
    assert!(matches!(err, ScraperError::NotFound(ref name) if name == "Rust"));
}

#[tokio::test]
async fn find_language_skips_malformed_row() {
    let body = THREE_LANGUAGES.replace("15.16%", "abc%");
    let scraper = serve(index_page(body)).await;

    let table = scraper.fetch_table().await.expect("Bad rows must not fail the fetch");
    assert_eq!(table.len(), 2);

    let err = scraper
        .find_language("Python")
        .await
        .expect_err("The malformed row should be dropped");
    assert!(matches!(err, ScraperError::NotFound(_)));
    assert!(scraper.find_language("C").await.is_ok());
}

#[tokio::test]
async fn server_error_fails_the_fetch() {
    let router = Router::new().route(
        "/tiobe-index/",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Html(THREE_LANGUAGES)) }),
    );
    let scraper = serve(router).await;

    let err = scraper
        .find_language("Go")
        .await
        .expect_err("A 500 must fail the lookup");
    assert!(
        matches!(err, ScraperError::UnexpectedStatus(status) if status.as_u16() == 500),
        "Got {err:?}"
    );
}

#[tokio::test]
async fn non_200_success_status_fails_the_fetch() {
    let router = Router::new().route("/tiobe-index/", get(|| async { StatusCode::NO_CONTENT }));
    let scraper = serve(router).await;

    let err = scraper.fetch_table().await.expect_err("Only 200 is accepted");
    assert!(matches!(err, ScraperError::UnexpectedStatus(status) if status.as_u16() == 204));
}

#[tokio::test]
async fn missing_page_fails_the_fetch() {
    let scraper = serve(Router::new()).await;

    let err = scraper.fetch_table().await.expect_err("404 must fail");
    assert!(matches!(err, ScraperError::UnexpectedStatus(status) if status.as_u16() == 404));
}

#[tokio::test]
async fn connection_refused_is_an_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    drop(listener);

    let scraper = WebScraper::with_base_url(format!("http://{addr}")).expect("scraper");
    let err = scraper.fetch_table().await.expect_err("Nothing is listening");
    assert!(matches!(err, ScraperError::HttpError(_)), "Got {err:?}");
}

#[tokio::test]
async fn fetch_table_from_fixture_page() {
    let html = fs::read_to_string("fixtures/tiobe_index.html").expect("Failed to read fixture");
    let scraper = serve(index_page(html)).await;

    let table = scraper.fetch_table().await.expect("Failed to fetch table");
    assert_eq!(table.len(), 20);
    assert!(table.find("Swift").is_none(), "Rows outside the top 20 are ignored");

    let rust = table.find("rust").expect("Rust should be in the top 20");
    assert_eq!(rust.rank(), 16);
    assert_eq!(rust.rating(), 1.22);
}
