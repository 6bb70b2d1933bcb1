// src/core/origin.rs
//
// Page URL → coarse wildcard origin ("https://*.example.edu/").
// Credentials and permission grants are keyed by this, so every subdomain
// of a site family shares one capture.

use std::fmt;

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum OriginError {
    #[error("invalid page URL {url:?}: {source}")]
    Parse { url: String, source: url::ParseError },

    #[error("page URL has no host: {0}")]
    NoHost(String),

    #[error("host {0:?} needs at least two labels")]
    SingleLabel(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OriginKey(String);

impl OriginKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Watcher scope patterns: the key with each suffix appended.
    pub fn scope_patterns<S: AsRef<str>>(&self, suffixes: &[S]) -> Vec<String> {
        suffixes
            .iter()
            .map(|sfx| join!(self.0.as_str(), sfx.as_ref()))
            .collect()
    }
}

impl fmt::Display for OriginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OriginKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn parse_page_url(text: &str) -> Result<Url, OriginError> {
    Url::parse(text.trim()).map_err(|source| OriginError::Parse { url: s!(text), source })
}

/// `b.c` stays `*.b.c`; longer hosts keep their second and third labels, so
/// `a.b.c` → `*.b.c` and `a.b.c.d` → `*.b.c`. Ports never count.
pub fn derive_origin_key(page: &Url) -> Result<OriginKey, OriginError> {
    let host = page
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| OriginError::NoHost(page.to_string()))?;

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let (domain, tld) = match labels.as_slice() {
        [domain, tld] => (*domain, *tld),
        [_, domain, tld, ..] => (*domain, *tld),
        _ => return Err(OriginError::SingleLabel(s!(host))),
    };

    Ok(OriginKey(format!("{}://*.{}.{}/", page.scheme(), domain, tld)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(u: &str) -> String {
        derive_origin_key(&Url::parse(u).unwrap()).unwrap().0
    }

    #[test]
    fn three_labels_drop_the_first() {
        assert_eq!(key("https://app.school.edu/courses/12"), "https://*.school.edu/");
    }

    #[test]
    fn two_labels_unchanged() {
        assert_eq!(key("https://school.edu"), "https://*.school.edu/");
    }

    #[test]
    fn port_and_path_ignored() {
        assert_eq!(key("http://api.school.edu:8443/x?y=1"), "http://*.school.edu/");
    }

    #[test]
    fn longer_hosts_keep_second_and_third_labels() {
        assert_eq!(key("https://app.dev.school.edu/x"), "https://*.dev.school/");
        assert_eq!(key("https://a.b.c.d.e/"), "https://*.b.c/");
    }

    #[test]
    fn single_label_rejected() {
        let u = Url::parse("http://localhost:3000/").unwrap();
        assert!(matches!(derive_origin_key(&u), Err(OriginError::SingleLabel(_))));
    }

    #[test]
    fn scope_patterns_append_suffix() {
        let k = OriginKey(s!("https://*.school.edu/"));
        assert_eq!(
            k.scope_patterns(&["*/attendance/*"]),
            vec![s!("https://*.school.edu/*/attendance/*")]
        );
    }
}
