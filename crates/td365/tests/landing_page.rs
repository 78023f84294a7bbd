use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use td365::{TdError, TdRestClient};

const LANDING_BODY: &str = concat!(
    "<html><body><form>",
    r#"<input type="hidden" id="hfLoginID" value="LOGIN"/>"#,
    r#"<input type="hidden" id="hfAccountID" value="ACC1"/>"#,
    "</form></body></html>"
);

/// Canned landing-page server: `/r/{i}` hops 302 through the chain, the
/// last hop sets the session cookie and lands on `/Advanced.aspx?ots=...`.
async fn landing_server(
    bind: &str,
    hops: usize,
    body: &'static str,
) -> (JoinHandle<()>, u16, Arc<AtomicUsize>) {
    let listener = TcpListener::bind((bind, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = requests.clone();
    let handle = tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };
            let mut buf = vec![0u8; 8192];
            let n = sock.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                continue;
            }
            counter.fetch_add(1, Ordering::SeqCst);
            let head = String::from_utf8_lossy(&buf[..n]).to_string();
            let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
            let response = route(&target, hops, body);
            let _ = sock.write_all(response.as_bytes()).await;
            let _ = sock.shutdown().await;
        }
    });
    (handle, port, requests)
}

fn route(target: &str, hops: usize, body: &str) -> String {
    if target.starts_with("/Advanced.aspx") {
        return http_response(200, &[], body);
    }
    let index: usize = target.strip_prefix("/r/").and_then(|s| s.parse().ok()).unwrap_or(0);
    if index + 1 >= hops {
        http_response(
            302,
            &[
                ("Location", "/Advanced.aspx?ots=WJFUMNFE".to_string()),
                ("Set-Cookie", "WJFUMNFE=TOKEN123; Max-Age=3600".to_string()),
            ],
            "",
        )
    } else {
        http_response(302, &[("Location", format!("/r/{}", index + 1))], "")
    }
}

fn http_response(status: u16, headers: &[(&str, String)], body: &str) -> String {
    let reason = match status {
        200 => "OK",
        302 => "Found",
        _ => "Error",
    };
    let mut out = format!("HTTP/1.1 {status} {reason}\r\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!("Content-Length: {}\r\nConnection: close\r\n\r\n{body}", body.len()));
    out
}

#[tokio::test]
async fn four_hop_chain_yields_token_and_login_id() {
    let (_server, port, requests) = landing_server("127.0.0.1", 4, LANDING_BODY).await;
    let platform_url = Url::parse(&format!("http://127.0.0.1:{port}/r/0")).unwrap();

    let (rest, auth) = TdRestClient::connect(&platform_url).await.unwrap();
    assert_eq!(auth.token, "TOKEN123");
    assert_eq!(auth.login_id, "LOGIN");
    assert_eq!(rest.account_id(), "ACC1");
    // 4 redirects plus the final page
    assert_eq!(requests.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn fifth_redirect_is_fatal() {
    let (_server, port, _requests) = landing_server("127.0.0.3", 5, LANDING_BODY).await;
    let platform_url = Url::parse(&format!("http://127.0.0.3:{port}/r/0")).unwrap();

    let err = TdRestClient::connect(&platform_url).await.unwrap_err();
    assert!(matches!(err, TdError::MaxRedirectDepth { max: 4, .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_login_field_stops_the_walk() {
    let body = r#"<html><input id="hfAccountID" value="ACC1"/></html>"#;
    let (_server, port, requests) = landing_server("127.0.0.4", 1, body).await;
    let platform_url = Url::parse(&format!("http://127.0.0.4:{port}/r/0")).unwrap();

    let err = TdRestClient::connect(&platform_url).await.unwrap_err();
    assert!(matches!(err, TdError::Extract { what: "hfLoginID", .. }), "got {err:?}");
    // one redirect, one landing page, nothing after the failure
    assert_eq!(requests.load(Ordering::SeqCst), 2);
}
