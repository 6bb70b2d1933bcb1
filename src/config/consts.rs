// src/config/consts.rs

// Capture scope, appended to the origin key
pub const SCOPE_SUFFIXES: [&str; 2] = ["*/attendance/*", "*/attendance/*/"];

// Observed field names
pub const COURSE_ID_FIELD: &str = "courseId";
pub const AUTH_TOKEN_HEADER: &str = "authtoken";

// Private API endpoints, relative to the captured data URL
pub const SESSIONS_ENDPOINT: &str = "sessions";
pub const STUDENTS_ENDPOINT: &str = "students";
pub const SESSION_ENDPOINT: &str = "session";

// Net
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("attendance_scrape/", env!("CARGO_PKG_VERSION"));

// Local files
pub const DEFAULT_LOG_FILE: &str = ".store/debug.log";
pub const DEFAULT_CONFIG_FILE: &str = "attendance_scrape.toml";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "attendance.csv";
