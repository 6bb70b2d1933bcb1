// tests/http_api.rs
//
// HttpApi against a one-shot local HTTP server that records what it got.

use std::net::SocketAddr;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use attendance_scrape::attendance::{AttendanceApi, FetchError, HttpApi};
use attendance_scrape::capture::Credentials;
use attendance_scrape::core::{derive_origin_key, HttpHeader, WireId};

struct Seen {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Seen {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Accept one connection, record the request, answer with `status` + `reply`.
async fn serve_once(status: &'static str, reply: &'static str) -> (SocketAddr, JoinHandle<Seen>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let task = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            let n = sock.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(i) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break i + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|l| l.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        let len = headers
            .iter()
            .find(|(k, _)| k == "content-length")
            .map(|(_, v)| v.parse::<usize>().unwrap())
            .unwrap_or(0);
        while buf.len() < head_end + len {
            let n = sock.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = buf[head_end..head_end + len].to_vec();

        let resp = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
            reply.len()
        );
        sock.write_all(resp.as_bytes()).await.unwrap();
        let _ = sock.shutdown().await;

        Seen { request_line, headers, body }
    });

    (addr, task)
}

fn api() -> HttpApi {
    HttpApi::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
}

fn creds(addr: SocketAddr) -> Credentials {
    let page = url::Url::parse("http://app.school.test/course/77").unwrap();
    Credentials {
        origin: derive_origin_key(&page).unwrap(),
        course_id: WireId::from("77"),
        auth_token: "tok-9".into(),
        data_url: format!("http://{addr}/v1/attendance/"),
        referrer_url: "http://app.school.test/course/77#roster".into(),
        headers: vec![
            HttpHeader::new("authtoken", "tok-9"),
            HttpHeader::new("X-Client", "v2"),
            HttpHeader::new("Cookie", "session=abc"),
            HttpHeader::new("Content-Length", "999"),
            HttpHeader::new("Origin", "http://app.school.test"),
            HttpHeader::new("Sec-Fetch-Mode", "cors"),
            HttpHeader { name: "X-Empty".into(), value: None },
        ],
    }
}

#[tokio::test]
async fn sessions_replays_captured_request() {
    let (addr, server) = serve_once(
        "200 OK",
        r#"[{"meeting":{"id":1,"startTime":"2024-04-01","endTime":null}}]"#,
    )
    .await;

    let sessions = api().sessions(&creds(addr)).await.unwrap();
    let seen = server.await.unwrap();

    assert_eq!(seen.request_line, "POST /v1/attendance/sessions HTTP/1.1");
    assert_eq!(seen.json(), json!({ "courseId": 77 }));
    assert_eq!(seen.header("authtoken"), Some("tok-9"));
    assert_eq!(seen.header("x-client"), Some("v2"));
    assert_eq!(seen.header("referer"), Some("http://app.school.test/"));
    assert_eq!(seen.header("cookie"), None);
    assert_eq!(seen.header("sec-fetch-mode"), None);
    assert_eq!(seen.header("x-empty"), None);
    assert_eq!(seen.header("content-length"), Some(seen.body.len().to_string().as_str()));

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].meeting.id, WireId::from(1u64));
    assert_eq!(sessions[0].meeting.end_time, "");
}

#[tokio::test]
async fn students_posts_course_id() {
    let (addr, server) = serve_once("200 OK", r#"[{"firstName":"Jo","lastName":"Lee"}]"#).await;

    let roster = api().students(&creds(addr)).await.unwrap();
    let seen = server.await.unwrap();

    assert_eq!(seen.request_line, "POST /v1/attendance/students HTTP/1.1");
    assert_eq!(seen.json(), json!({ "courseId": 77 }));
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].last_name, "Lee");
}

#[tokio::test]
async fn session_info_posts_meeting_id() {
    let (addr, server) = serve_once(
        "200 OK",
        r#"{"startTime":"2024-04-01","name":"Intro","required":true,"students":[{"presence":true}]}"#,
    )
    .await;

    let info = api().session_info(&creds(addr), &WireId::from("881")).await.unwrap();
    let seen = server.await.unwrap();

    assert_eq!(seen.request_line, "POST /v1/attendance/session HTTP/1.1");
    assert_eq!(seen.json(), json!({ "meetingId": 881 }));
    assert_eq!(info.name, "Intro");
    assert_eq!(info.students.len(), 1);
}

#[tokio::test]
async fn error_status_is_a_fetch_failure() {
    let (addr, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;

    let err = api().students(&creds(addr)).await.unwrap_err();
    server.await.unwrap();

    match err {
        FetchError::Status { endpoint, status } => {
            assert_eq!(endpoint, "students");
            assert_eq!(status, 500);
        }
        other => panic!("expected status error, got {other}"),
    }
}
