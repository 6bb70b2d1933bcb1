// tests/capture_flow.rs
//
// HAR traffic → watchers → credential record, through the Scanner.

use attendance_scrape::capture::{har, StaticGrant, WatchKind, WatchState};
use attendance_scrape::config::options::CaptureOptions;
use attendance_scrape::core::origin::parse_page_url;
use attendance_scrape::core::WireId;
use attendance_scrape::{ScanError, ScanPlan, Scanner};

const PAGE: &str = "https://app.school.edu/course/4711/attendance";

fn entry(url: &str, body: &str, token: &str) -> String {
    format!(
        r#"{{
          "request": {{
            "method": "POST",
            "url": "{url}",
            "headers": [
              {{ "name": "Origin", "value": "https://app.school.edu" }},
              {{ "name": "Content-Type", "value": "application/json" }},
              {{ "name": "authtoken", "value": "{token}" }}
            ],
            "postData": {{ "mimeType": "application/json", "text": {body:?} }}
          }}
        }}"#
    )
}

fn har_text(entries: &[String]) -> String {
    format!(r#"{{ "log": {{ "version": "1.2", "entries": [{}] }} }}"#, entries.join(","))
}

#[test]
fn denied_permission_arms_nothing() {
    let mut scanner = Scanner::new(&CaptureOptions::default());
    let page = parse_page_url(PAGE).unwrap();

    let err = scanner.scan(&page, &mut StaticGrant(false)).unwrap_err();
    assert!(matches!(err, ScanError::PermissionDenied(ref o) if o.as_str() == "https://*.school.edu/"));
    assert!(scanner.interceptor().watchers().is_empty());
}

#[test]
fn first_scan_arms_both_watchers_once() {
    let mut scanner = Scanner::new(&CaptureOptions::default());
    let page = parse_page_url(PAGE).unwrap();

    let first = scanner.scan(&page, &mut StaticGrant(true)).unwrap();
    let ScanPlan::Capturing { armed, missing, .. } = first else { panic!("expected capture") };
    assert_eq!(armed.len(), 2);
    assert_eq!(missing.len(), 5);

    // Clicking again before any traffic must not stack watchers.
    let again = scanner.scan(&page, &mut StaticGrant(true)).unwrap();
    let ScanPlan::Capturing { armed: armed2, .. } = again else { panic!("expected capture") };
    assert_eq!(armed, armed2);
    assert_eq!(scanner.interceptor().watchers().len(), 2);
}

#[test]
fn har_replay_completes_record() {
    let mut scanner = Scanner::new(&CaptureOptions::default());
    let page = parse_page_url(PAGE).unwrap();
    scanner.scan(&page, &mut StaticGrant(true)).unwrap();

    let text = har_text(&[entry(
        "https://api.school.edu/v1/attendance/sessions",
        r#"{"courseId":"4711"}"#,
        "tok-123",
    )]);
    let parsed = har::parse(&text).unwrap();
    let obs = scanner.observe_all(parsed.events().iter());
    assert_eq!(obs.fired.len(), 2);

    let plan = scanner.scan(&page, &mut StaticGrant(false)).unwrap();
    let ScanPlan::Ready(creds) = plan else { panic!("expected ready") };
    assert_eq!(creds.course_id, WireId::from("4711"));
    assert_eq!(creds.auth_token, "tok-123");
    assert_eq!(creds.data_url, "https://api.school.edu/v1/attendance");
    assert_eq!(creds.referrer_url, "https://app.school.edu");
    assert!(creds.headers.iter().any(|h| h.name == "authtoken"));
}

#[test]
fn watchers_fire_once_and_keep_first_values() {
    let mut scanner = Scanner::new(&CaptureOptions::default());
    let page = parse_page_url(PAGE).unwrap();
    scanner.scan(&page, &mut StaticGrant(true)).unwrap();

    let text = har_text(&[
        entry("https://api.school.edu/v1/attendance/students", r#"{"courseId":11}"#, "first"),
        entry("https://api.school.edu/v1/attendance/sessions", r#"{"courseId":22}"#, "second"),
    ]);
    let parsed = har::parse(&text).unwrap();
    scanner.observe_all(parsed.events().iter());

    let origin = attendance_scrape::core::derive_origin_key(&page).unwrap();
    let record = scanner.record(&origin).unwrap();
    assert_eq!(record.course_id, Some(WireId::from(11u64)));
    assert_eq!(record.auth_token.as_deref(), Some("first"));
    assert!(scanner
        .interceptor()
        .watchers()
        .iter()
        .all(|w| w.state == WatchState::Fired));

    // Fired watchers are not re-armed by a later scan.
    let plan = scanner.scan(&page, &mut StaticGrant(true)).unwrap();
    assert!(matches!(plan, ScanPlan::Ready(_)));
    assert_eq!(scanner.interceptor().watchers().len(), 2);
}

#[test]
fn out_of_scope_traffic_is_ignored() {
    let mut scanner = Scanner::new(&CaptureOptions::default());
    let page = parse_page_url(PAGE).unwrap();
    scanner.scan(&page, &mut StaticGrant(true)).unwrap();

    let text = har_text(&[
        entry("https://api.other.edu/v1/attendance/sessions", r#"{"courseId":1}"#, "x"),
        entry("https://api.school.edu/v1/grades/list", r#"{"courseId":1}"#, "x"),
    ]);
    let parsed = har::parse(&text).unwrap();
    let obs = scanner.observe_all(parsed.events().iter());
    assert!(obs.is_empty());

    let origin = attendance_scrape::core::derive_origin_key(&page).unwrap();
    assert!(scanner
        .interceptor()
        .is_armed(&origin, WatchKind::CourseId));
    assert!(scanner.interceptor().is_armed(&origin, WatchKind::AuthToken));
}

#[test]
fn partial_capture_reports_what_is_missing() {
    let mut scanner = Scanner::new(&CaptureOptions::default());
    let page = parse_page_url(PAGE).unwrap();
    scanner.scan(&page, &mut StaticGrant(true)).unwrap();

    // Body without courseId: only the token watcher fires.
    let text = har_text(&[entry(
        "https://api.school.edu/v1/attendance/sessions",
        r#"{"page":1}"#,
        "tok",
    )]);
    let parsed = har::parse(&text).unwrap();
    scanner.observe_all(parsed.events().iter());

    let plan = scanner.scan(&page, &mut StaticGrant(true)).unwrap();
    let ScanPlan::Capturing { missing, .. } = plan else { panic!("expected capture") };
    assert!(missing.contains(&"courseId"));
    assert!(!missing.contains(&"authToken"));
}
