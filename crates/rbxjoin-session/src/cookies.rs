//! The per-session cookie jar.
//!
//! A deliberately small jar: one flat name→value map, no domain or path
//! scoping. Every host the client talks to sits under the same platform
//! domain, and every cookie it sets is meant to travel to all of them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Cookies carried by one session.
///
/// Seeded with the session credential; updated from every response's
/// `Set-Cookie` headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cookie directly.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Returns the current value of a cookie.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Applies one `Set-Cookie` header value.
    ///
    /// Of `name=value; Path=/; Max-Age=...; Expires=...`, only the expiry
    /// attributes are read. The cookie is deleted when the value is empty,
    /// when `Max-Age` is zero or negative, or, absent `Max-Age`, when
    /// `Expires` is in the past. Malformed values are ignored.
    pub fn absorb(&mut self, set_cookie: &str) {
        self.absorb_at(set_cookie, Utc::now());
    }

    fn absorb_at(&mut self, set_cookie: &str, now: DateTime<Utc>) {
        let mut parts = set_cookie.split(';');
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let value = value.trim().trim_matches('"');

        let mut max_age = None;
        let mut expires = None;
        for attr in parts {
            let Some((key, val)) = attr.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.eq_ignore_ascii_case("max-age") {
                max_age = val.trim().parse::<i64>().ok();
            } else if key.eq_ignore_ascii_case("expires") {
                expires = parse_expires(val);
            }
        }

        // Max-Age wins over Expires when both are present.
        let expired = match max_age {
            Some(seconds) => seconds <= 0,
            None => expires.is_some_and(|at| at <= now),
        };

        if expired || value.is_empty() {
            if self.cookies.remove(name).is_some() {
                tracing::debug!(cookie = name, "cookie cleared by response");
            }
        } else {
            self.cookies.insert(name.to_string(), value.to_string());
        }
    }

    /// Renders the jar as a `Cookie` request header value: `a=1; b=2`.
    ///
    /// Returns `None` when the jar is empty.
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Parses an `Expires` date: `Thu, 01 Jan 1970 00:00:00 GMT`, also in the
/// older `01-Jan-1970` form.
fn parse_expires(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.trim().replace('-', " ");
    DateTime::parse_from_rfc2822(&normalized)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_inserts_and_replaces() {
        let mut jar = CookieJar::new();
        jar.absorb("RBXEventTrackerV2=abc; path=/; domain=.roblox.com");
        assert_eq!(jar.get("RBXEventTrackerV2"), Some("abc"));

        jar.absorb("RBXEventTrackerV2=def; path=/");
        assert_eq!(jar.get("RBXEventTrackerV2"), Some("def"));
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_absorb_keeps_equals_signs_in_value() {
        let mut jar = CookieJar::new();
        jar.absorb("token=a=b==; HttpOnly");
        assert_eq!(jar.get("token"), Some("a=b=="));
    }

    #[test]
    fn test_max_age_zero_removes() {
        let mut jar = CookieJar::new();
        jar.insert("a", "1");
        jar.absorb("a=gone; Max-Age=0; path=/");
        assert_eq!(jar.get("a"), None);
    }

    #[test]
    fn test_past_expires_removes() {
        let mut jar = CookieJar::new();
        jar.insert("RBXSessionTracker", "old");
        jar.absorb("RBXSessionTracker=stale; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/");
        assert_eq!(jar.get("RBXSessionTracker"), None);
    }

    #[test]
    fn test_past_expires_with_dashed_date_removes() {
        let mut jar = CookieJar::new();
        jar.insert("a", "1");
        jar.absorb("a=stale; Expires=Thu, 01-Jan-1970 00:00:00 GMT");
        assert_eq!(jar.get("a"), None);
    }

    #[test]
    fn test_future_expires_keeps() {
        let now = DateTime::parse_from_rfc2822("Mon, 01 Jan 2024 00:00:00 GMT")
            .unwrap()
            .with_timezone(&Utc);
        let mut jar = CookieJar::new();
        jar.absorb_at("a=fresh; expires=Wed, 01 Jan 2031 00:00:00 GMT", now);
        assert_eq!(jar.get("a"), Some("fresh"));
    }

    #[test]
    fn test_max_age_overrides_past_expires() {
        let mut jar = CookieJar::new();
        jar.absorb("a=kept; Max-Age=3600; expires=Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(jar.get("a"), Some("kept"));
    }

    #[test]
    fn test_unparseable_expires_is_ignored() {
        let mut jar = CookieJar::new();
        jar.absorb("a=1; expires=sometime soon");
        assert_eq!(jar.get("a"), Some("1"));
    }

    #[test]
    fn test_empty_value_removes() {
        let mut jar = CookieJar::new();
        jar.insert("a", "1");
        jar.absorb("a=; expires=Thu, 01 Jan 1970 00:00:00 GMT");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_malformed_values_are_ignored() {
        let mut jar = CookieJar::new();
        jar.absorb("no-equals-sign");
        jar.absorb("=value");
        jar.absorb("");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_header_value_joins_in_name_order() {
        let mut jar = CookieJar::new();
        assert_eq!(jar.header_value(), None);
        jar.insert("b", "2");
        jar.insert("a", "1");
        assert_eq!(jar.header_value().as_deref(), Some("a=1; b=2"));
    }
}
