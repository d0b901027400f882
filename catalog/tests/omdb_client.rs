use scout_catalog::{CatalogConfig, OmdbClient, TitleLookup};
use scout_core::{CatalogError, MovieCatalogService, MovieKind};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one canned HTTP response and hand back the request line that was received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 { break; }
            buf.extend_from_slice(&chunk[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&buf).lines().next().unwrap_or_default().to_string()
    });
    (format!("http://{addr}"), handle)
}

fn client(base_url: String) -> OmdbClient {
    OmdbClient::new(CatalogConfig { base_url, api_key: "k3y".into(), timeout_secs: 5, ..CatalogConfig::default() }).unwrap()
}

#[tokio::test]
async fn fetch_sends_query_and_decodes_page() {
    let body = r#"{"Search":[{"Title":"Batman","Year":"1989","imdbID":"tt0096895","Type":"movie","Poster":"N/A"}],"totalResults":"23","Response":"True"}"#;
    let (base, server) = serve_once("200 OK", body).await;

    let page = client(base).fetch("batman returns", 2, Some(MovieKind::Movie)).await.unwrap();
    assert_eq!(page.total_results, 23);
    assert_eq!(page.items[0].id, "tt0096895");

    let request_line = server.await.unwrap();
    assert!(request_line.starts_with("GET /?"), "{request_line}");
    assert!(request_line.contains("apikey=k3y"));
    assert!(request_line.contains("s=batman+returns"));
    assert!(request_line.contains("page=2"));
    assert!(request_line.contains("type=movie"));
}

#[tokio::test]
async fn refused_key_is_rejected_not_network() {
    let (base, _server) = serve_once("401 Unauthorized", r#"{"Response":"False","Error":"Invalid API key!"}"#).await;
    let err = client(base).fetch("batman", 1, None).await.unwrap_err();
    assert_eq!(err, CatalogError::Rejected("Invalid API key!".into()));
}

#[tokio::test]
async fn server_error_is_network() {
    let (base, _server) = serve_once("502 Bad Gateway", "upstream down").await;
    let err = client(base).fetch("batman", 1, None).await.unwrap_err();
    assert_eq!(err, CatalogError::Network("HTTP 502".into()));
}

#[tokio::test]
async fn details_are_fetched_by_id() {
    let body = r#"{"Title":"Pulp Fiction","Year":"1994","Director":"Quentin Tarantino","imdbID":"tt0110912","Type":"movie","Response":"True"}"#;
    let (base, server) = serve_once("200 OK", body).await;
    let detail = client(base).details("tt0110912").await.unwrap();
    assert_eq!(detail.title, "Pulp Fiction");
    let request_line = server.await.unwrap();
    assert!(request_line.contains("i=tt0110912"));
    assert!(request_line.contains("plot=full"));
}
