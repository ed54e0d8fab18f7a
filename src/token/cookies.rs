//! Cookie persistence for the token pair.
//!
//! The console keeps both tokens in cookies so a server-rendered request can
//! see them. Page scripts read the pair back on the client, so the cookies
//! are not HttpOnly.

use std::time::Duration;

use super::TokenPair;

#[derive(Debug, Clone, Copy)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct CookieOptions {
    pub secure: bool,
    pub same_site: SameSite,
}

impl Default for CookieOptions {
    fn default() -> Self {
        CookieOptions {
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

pub const ACCESS_COOKIE_NAME: &str = "sigac.token";
pub const REFRESH_COOKIE_NAME: &str = "sigac.refresh_token";
/// Both cookies are scoped to the whole site so every page sees the session.
pub const COOKIE_PATH: &str = "/";
pub const COOKIE_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 30);

pub fn build_token_cookie(
    name: &str,
    value: &str,
    max_age: Duration,
    options: CookieOptions,
) -> String {
    let mut cookie = format!(
        "{}={}; Path={}; Max-Age={}; SameSite={}",
        name,
        value,
        COOKIE_PATH,
        max_age.as_secs(),
        same_site_value(options.same_site)
    );
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn build_clear_cookie(name: &str, options: CookieOptions) -> String {
    let mut cookie = format!(
        "{}=; Path={}; Max-Age=0; SameSite={}",
        name,
        COOKIE_PATH,
        same_site_value(options.same_site)
    );
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie values persisting `pair`.
pub fn pair_to_cookies(pair: &TokenPair, options: CookieOptions) -> [String; 2] {
    [
        build_token_cookie(ACCESS_COOKIE_NAME, pair.access_token(), COOKIE_MAX_AGE, options),
        build_token_cookie(REFRESH_COOKIE_NAME, pair.refresh_token(), COOKIE_MAX_AGE, options),
    ]
}

/// Set-Cookie values removing both halves of the pair.
pub fn clearing_cookies(options: CookieOptions) -> [String; 2] {
    [
        build_clear_cookie(ACCESS_COOKIE_NAME, options),
        build_clear_cookie(REFRESH_COOKIE_NAME, options),
    ]
}

pub fn extract_cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next()?.trim();
        let value = parts.next()?.trim();
        if key == name {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Reads a full pair out of a `Cookie` request header. Returns `None` unless
/// both cookies are present.
pub fn pair_from_header(header: &str) -> Option<TokenPair> {
    let access = extract_cookie_value(header, ACCESS_COOKIE_NAME)?;
    let refresh = extract_cookie_value(header, REFRESH_COOKIE_NAME)?;
    Some(TokenPair::new(access, refresh))
}

fn same_site_value(same_site: SameSite) -> &'static str {
    match same_site {
        SameSite::Lax => "Lax",
        SameSite::Strict => "Strict",
        SameSite::None => "None",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cookie_carries_lifetime_and_path() {
        let opts = CookieOptions {
            secure: true,
            same_site: SameSite::Lax,
        };
        let cookie = build_token_cookie(ACCESS_COOKIE_NAME, "abc", COOKIE_MAX_AGE, opts);
        assert!(cookie.starts_with("sigac.token=abc"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Secure"));
        assert!(!cookie.contains("HttpOnly"));
    }

    #[test]
    fn clear_cookie_sets_max_age_zero() {
        let cookie = build_clear_cookie(REFRESH_COOKIE_NAME, CookieOptions::default());
        assert!(cookie.starts_with("sigac.refresh_token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn pair_to_cookies_writes_both_names() {
        let pair = TokenPair::new("a", "r");
        let [access, refresh] = pair_to_cookies(&pair, CookieOptions::default());
        assert!(access.starts_with("sigac.token=a"));
        assert!(refresh.starts_with("sigac.refresh_token=r"));
    }

    #[test]
    fn extract_cookie_value_finds_matching_name() {
        let header = "theme=dark; sigac.token=token-value; other=2";
        assert_eq!(
            extract_cookie_value(header, ACCESS_COOKIE_NAME).as_deref(),
            Some("token-value")
        );
        assert!(extract_cookie_value(header, "missing").is_none());
    }

    #[test]
    fn pair_from_header_requires_both_cookies() {
        let full = "sigac.token=a; sigac.refresh_token=r";
        let pair = pair_from_header(full).unwrap();
        assert_eq!(pair.access_token(), "a");
        assert_eq!(pair.refresh_token(), "r");

        assert!(pair_from_header("sigac.token=a").is_none());
        assert!(pair_from_header("").is_none());
    }
}
