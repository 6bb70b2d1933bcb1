// src/core/pattern.rs
//
// Browser-style URL match patterns: `<scheme>://<host><path>`.
//   scheme: `*` (http or https) or a literal scheme
//   host:   `*`, `*.<domain>` (domain and any subdomain) or a literal host
//   path:   glob where `*` matches any run of characters, query included

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("match pattern {0:?} is missing \"://\"")]
    NoScheme(String),

    #[error("match pattern {0:?} is missing a path")]
    NoPath(String),

    #[error("match pattern {0:?} has a misplaced host wildcard")]
    BadHost(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum HostRule {
    Any,
    Suffix(String),
    Exact(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchPattern {
    raw: String,
    scheme: Option<String>,
    host: HostRule,
    path: String,
}

impl MatchPattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let (scheme, rest) = raw
            .split_once("://")
            .ok_or_else(|| PatternError::NoScheme(s!(raw)))?;
        let slash = rest.find('/').ok_or_else(|| PatternError::NoPath(s!(raw)))?;
        let (host, path) = rest.split_at(slash);

        let host = match host {
            "*" => HostRule::Any,
            h if h.starts_with("*.") && !h[2..].contains('*') => {
                HostRule::Suffix(h[2..].to_ascii_lowercase())
            }
            h if h.contains('*') || h.is_empty() => return Err(PatternError::BadHost(s!(raw))),
            h => HostRule::Exact(h.to_ascii_lowercase()),
        };

        Ok(Self {
            raw: s!(raw),
            scheme: (scheme != "*").then(|| scheme.to_ascii_lowercase()),
            host,
            path: s!(path),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, url: &Url) -> bool {
        let scheme_ok = match &self.scheme {
            Some(s) => url.scheme() == s,
            None => matches!(url.scheme(), "http" | "https"),
        };
        if !scheme_ok {
            return false;
        }

        let host = url.host_str().unwrap_or("");
        let host_ok = match &self.host {
            HostRule::Any => true,
            HostRule::Exact(h) => host == h,
            HostRule::Suffix(d) => {
                host == d || (host.len() > d.len() && host.ends_with(d.as_str())
                    && host.as_bytes()[host.len() - d.len() - 1] == b'.')
            }
        };
        if !host_ok {
            return false;
        }

        let mut target = s!(url.path());
        if let Some(q) = url.query() {
            target.push('?');
            target.push_str(q);
        }
        glob_match(&self.path, &target)
    }
}

/// `*`-only glob. Linear backtracking on the last star.
fn glob_match(pattern: &str, text: &str) -> bool {
    let p = pattern.as_bytes();
    let t = text.as_bytes();
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut mark = 0usize;

    while ti < t.len() {
        if pi < p.len() && p[pi] == b'*' {
            star = Some(pi);
            pi += 1;
            mark = ti;
        } else if pi < p.len() && p[pi] == t[ti] {
            pi += 1;
            ti += 1;
        } else if let Some(sp) = star {
            pi = sp + 1;
            mark += 1;
            ti = mark;
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == b'*' {
        pi += 1;
    }
    pi == p.len()
}
