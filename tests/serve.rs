//! End-to-end tests: a real server on an ephemeral loopback port, spoken to
//! with raw HTTP/1.1 over a TCP socket.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cors_serve::config::Config;
use cors_serve::server::{bind_listener, Server, ShutdownSignal};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

const INDEX_HTML: &[u8] = b"<!doctype html>\n<title>fixture</title>\n<p>hello</p>\n";

struct TestServer {
    addr: SocketAddr,
    root: PathBuf,
    shutdown: Arc<ShutdownSignal>,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "cors-serve-it-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("assets")).unwrap();
        std::fs::create_dir_all(root.join("assets/img")).unwrap();
        std::fs::write(root.join("index.html"), INDEX_HTML).unwrap();
        std::fs::write(root.join("assets/app.js"), b"export const x = 1;\n").unwrap();
        std::fs::write(root.join("assets/Notes.txt"), b"notes").unwrap();

        let mut cfg = Config::default();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 0;
        cfg.files.root = root.to_string_lossy().into_owned();
        cfg.logging.access_log = false;

        let server = Server::bind(&cfg).unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = Arc::new(ShutdownSignal::new());
        let handle = tokio::spawn(server.run(Arc::clone(&shutdown)));

        Self {
            addr,
            root,
            shutdown,
            handle,
        }
    }

    async fn send(&self, method: &str, target: &str) -> RawResponse {
        let raw = format!(
            "{method} {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
        );
        send_raw(self.addr, &raw).await
    }

    async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server loop should stop")
            .unwrap();
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

struct RawResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RawResponse {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|(n, _)| n == name)
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

async fn send_raw(addr: SocketAddr, raw: &str) -> RawResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut buf))
        .await
        .expect("response should complete")
        .unwrap();

    let split = buf
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response head terminator");
    let head = String::from_utf8(buf[..split].to_vec()).unwrap();
    let body = buf[split + 4..].to_vec();

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap();
    let status = status_line
        .split(' ')
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status code");
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    RawResponse {
        status,
        headers,
        body,
    }
}

#[tokio::test]
async fn every_response_carries_wildcard_origin() {
    let server = TestServer::start("cors").await;

    for (method, target) in [
        ("GET", "/index.html"),
        ("GET", "/"),
        ("GET", "/assets/"),
        ("GET", "/assets"),
        ("HEAD", "/index.html"),
        ("GET", "/does-not-exist.xyz"),
        ("POST", "/index.html"),
        ("DELETE", "/assets/app.js"),
        ("OPTIONS", "/"),
    ] {
        let resp = server.send(method, target).await;
        assert_eq!(
            resp.header("access-control-allow-origin"),
            Some("*"),
            "{method} {target} -> {}",
            resp.status
        );
    }

    server.stop().await;
}

#[tokio::test]
async fn serves_index_file_bytes() {
    let server = TestServer::start("index").await;

    let resp = server.send("GET", "/index.html").await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, INDEX_HTML);
    assert!(resp.header("content-type").unwrap().starts_with("text/html"));
    assert_eq!(
        resp.header("content-length"),
        Some(INDEX_HTML.len().to_string().as_str())
    );
    assert!(resp.header("last-modified").is_some());

    // The root directory falls back to the same index file
    let root = server.send("GET", "/").await;
    assert_eq!(root.status, 200);
    assert_eq!(root.body, INDEX_HTML);

    server.stop().await;
}

#[tokio::test]
async fn cors_header_follows_file_headers() {
    let server = TestServer::start("order").await;

    let resp = server.send("GET", "/assets/app.js").await;
    let cors = resp.position("access-control-allow-origin").unwrap();
    for name in ["content-type", "content-length", "last-modified", "server"] {
        assert!(resp.position(name).unwrap() < cors, "{name} should precede the CORS header");
    }

    server.stop().await;
}

#[tokio::test]
async fn missing_path_is_404_with_cors() {
    let server = TestServer::start("missing").await;

    let resp = server.send("GET", "/does-not-exist.xyz").await;
    assert_eq!(resp.status, 404);
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
    assert!(resp.body_text().contains("404"));

    server.stop().await;
}

#[tokio::test]
async fn directory_without_index_is_listed() {
    let server = TestServer::start("listing").await;

    let redirect = server.send("GET", "/assets").await;
    assert_eq!(redirect.status, 301);
    assert_eq!(redirect.header("location"), Some("/assets/"));

    let resp = server.send("GET", "/assets/").await;
    assert_eq!(resp.status, 200);
    let page = resp.body_text();
    assert!(page.contains("Directory listing for /assets/"));
    assert!(page.contains("href=\"app.js\""));
    assert!(page.contains("href=\"Notes.txt\""));
    assert!(page.contains("href=\"img/\""));
    assert!(!page.contains("index.html"));

    server.stop().await;
}

#[tokio::test]
async fn path_traversal_never_leaks_outside_root() {
    let server = TestServer::start("traversal").await;
    let outside = server.root.with_file_name(format!(
        "cors-serve-it-outside-{}.txt",
        std::process::id()
    ));
    std::fs::write(&outside, b"outside-secret").unwrap();
    let outside_name = outside.file_name().unwrap().to_string_lossy().into_owned();

    for target in [
        "/../../etc/passwd".to_string(),
        "/%2e%2e/%2e%2e/etc/passwd".to_string(),
        format!("/../{outside_name}"),
        format!("/assets/../../{outside_name}"),
    ] {
        let resp = server.send("GET", &target).await;
        assert!(
            resp.status == 404 || resp.status == 400,
            "{target} -> {}",
            resp.status
        );
        assert!(!resp.body_text().contains("outside-secret"));
        assert!(!resp.body_text().contains("root:"));
    }

    let _ = std::fs::remove_file(&outside);
    server.stop().await;
}

#[tokio::test]
async fn unsupported_method_is_501() {
    let server = TestServer::start("method").await;

    let resp = server.send("PUT", "/index.html").await;
    assert_eq!(resp.status, 501);
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));

    server.stop().await;
}

#[tokio::test]
async fn unparseable_request_gets_bare_400() {
    let server = TestServer::start("garbage").await;

    // hyper rejects this before the CORS decorator sees a request
    let resp = send_raw(server.addr, "GARBAGE\r\n\r\n").await;
    assert_eq!(resp.status, 400);
    assert_eq!(resp.header("access-control-allow-origin"), None);

    server.stop().await;
}

#[tokio::test]
async fn head_returns_headers_only() {
    let server = TestServer::start("head").await;

    let resp = server.send("HEAD", "/index.html").await;
    assert_eq!(resp.status, 200);
    assert_eq!(
        resp.header("content-length"),
        Some(INDEX_HTML.len().to_string().as_str())
    );
    assert!(resp.body.is_empty());

    server.stop().await;
}

#[tokio::test]
async fn range_request_returns_partial_content() {
    let server = TestServer::start("range").await;

    let raw = "GET /index.html HTTP/1.1\r\nHost: localhost\r\nRange: bytes=0-8\r\nConnection: close\r\n\r\n";
    let resp = send_raw(server.addr, raw).await;
    assert_eq!(resp.status, 206);
    assert_eq!(resp.body, &INDEX_HTML[..9]);
    assert_eq!(
        resp.header("content-range"),
        Some(format!("bytes 0-8/{}", INDEX_HTML.len()).as_str())
    );
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));

    server.stop().await;
}

#[tokio::test]
async fn second_instance_fails_to_bind() {
    let server = TestServer::start("bind").await;

    let mut cfg = Config::default();
    cfg.server.host = "127.0.0.1".to_string();
    cfg.server.port = server.addr.port();
    cfg.files.root = server.root.to_string_lossy().into_owned();

    match Server::bind(&cfg) {
        Err(err) => assert!(err.is_addr_in_use(), "unexpected error: {err}"),
        Ok(_) => panic!("second bind on {} should fail", server.addr),
    }

    server.stop().await;
}

#[tokio::test]
async fn shutdown_releases_the_port() {
    let server = TestServer::start("shutdown").await;
    let addr = server.addr;

    assert_eq!(server.send("GET", "/index.html").await.status, 200);
    server.stop().await;

    let rebound = bind_listener(addr);
    assert!(rebound.is_ok(), "port should be free after shutdown");
}
