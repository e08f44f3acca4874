use reqwest::StatusCode;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use table_orders_cli::api::{ApiClient, PosApi, SECTIONS_TIMEOUT};
use table_orders_cli::error::ApiError;

// --- Loopback HTTP stub ---

enum Reply {
    /// Status code and JSON body.
    Json(u16, &'static str),
    /// Read the request, then hold the connection open without answering.
    Stall(Duration),
}

/// Read one request (head plus `Content-Length` body) as text.
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serve `replies` one connection each, in order. The handle yields the raw
/// requests received.
fn serve(replies: Vec<Reply>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for reply in replies {
            let (mut stream, _) = listener.accept().unwrap();
            requests.push(read_request(&mut stream));
            match reply {
                Reply::Json(code, body) => {
                    let status = StatusCode::from_u16(code).unwrap();
                    let response = format!(
                        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        code,
                        status.canonical_reason().unwrap_or(""),
                        body.len(),
                        body
                    );
                    stream.write_all(response.as_bytes()).unwrap();
                }
                Reply::Stall(hold) => thread::sleep(hold),
            }
        }
        requests
    });
    (base_url, handle)
}

// --- Tests ---

#[test]
fn bearer_token_is_sent_after_authentication() {
    let (base_url, server) = serve(vec![
        Reply::Json(200, r#"{"correlationId":"c1","token":"tok-123"}"#),
        Reply::Json(
            200,
            r#"{"organizations":[{"id":"o1","name":"A"},{"name":"no id"}]}"#,
        ),
    ]);
    let mut api = ApiClient::new(&base_url, false).unwrap();

    assert_eq!(api.authenticate("secret").unwrap(), "tok-123");
    let orgs = api.organizations().unwrap();
    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0].id.as_deref(), Some("o1"));
    assert_eq!(orgs[1].id, None);

    let requests = server.join().unwrap();
    assert!(requests[0].starts_with("POST /api/1/access_token "));
    assert!(requests[0].contains(r#"{"apiLogin":"secret"}"#));
    assert!(!requests[0].to_ascii_lowercase().contains("authorization:"));
    let listing = requests[1].to_ascii_lowercase();
    assert!(listing.starts_with("get /api/1/organizations "));
    assert!(listing.contains("authorization: bearer tok-123\r\n"));
}

#[test]
fn non_success_status_keeps_the_body() {
    let (base_url, server) = serve(vec![Reply::Json(
        401,
        r#"{"errorDescription":"Login is not authorized"}"#,
    )]);
    let mut api = ApiClient::new(&base_url, false).unwrap();

    match api.authenticate("wrong") {
        Err(ApiError::Http {
            endpoint,
            status,
            body,
        }) => {
            assert_eq!(endpoint, "/api/1/access_token");
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(body.contains("Login is not authorized"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    server.join().unwrap();
}

#[test]
fn success_without_token_is_a_shape_error() {
    let (base_url, server) = serve(vec![Reply::Json(200, r#"{"correlationId":"c1"}"#)]);
    let mut api = ApiClient::new(&base_url, false).unwrap();

    assert!(matches!(
        api.authenticate("secret"),
        Err(ApiError::Shape { endpoint: "/api/1/access_token", .. })
    ));
    server.join().unwrap();
}

#[test]
fn slow_section_lookup_times_out() {
    // The stub thread is left to finish on its own.
    let (base_url, _server) = serve(vec![Reply::Stall(SECTIONS_TIMEOUT + Duration::from_secs(10))]);
    let api = ApiClient::new(&base_url, false).unwrap();

    match api.restaurant_sections(&["tg1".to_string()]) {
        Err(ApiError::Timeout { endpoint, limit }) => {
            assert_eq!(endpoint, "/api/1/reserve/available_restaurant_sections");
            assert_eq!(limit, SECTIONS_TIMEOUT);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn refused_connection_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let api = ApiClient::new(&base_url, false).unwrap();

    assert!(matches!(
        api.organizations(),
        Err(ApiError::Transport { endpoint: "/api/1/organizations", .. })
    ));
}
