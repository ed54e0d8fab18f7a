//! Server-side route guards.
//!
//! Each guard inspects the request's cookies and either renders the page
//! through the supplied loader or redirects. Decisions that end the session
//! also carry expired cookies so the browser forgets the stale pair.

pub mod claims;

use std::future::Future;

use tracing::debug;

use crate::api::{AccessLevel, ApiClient};
use crate::config::Config;
use crate::error::ApiError;
use crate::session::{DASHBOARD_ROUTE, SIGN_IN_ROUTE};
use crate::token::cookies::{self, CookieOptions, ACCESS_COOKIE_NAME};

/// What a guarded route should do with the request.
#[derive(Debug, PartialEq)]
pub enum GuardOutcome<T> {
    /// Render with the loader's data.
    Render(T),
    /// Send the browser elsewhere.
    Redirect { location: String },
    /// Send the browser elsewhere and expire the auth cookies on the way.
    RedirectWithClear {
        location: String,
        cookies: [String; 2],
    },
}

impl<T> GuardOutcome<T> {
    fn redirect(location: &str) -> Self {
        GuardOutcome::Redirect {
            location: location.to_string(),
        }
    }

    fn redirect_with_clear(location: &str) -> Self {
        GuardOutcome::RedirectWithClear {
            location: location.to_string(),
            cookies: cookies::clearing_cookies(CookieOptions::default()),
        }
    }

    /// Where the browser is being sent, if anywhere.
    pub fn location(&self) -> Option<&str> {
        match self {
            GuardOutcome::Render(_) => None,
            GuardOutcome::Redirect { location } => Some(location),
            GuardOutcome::RedirectWithClear { location, .. } => Some(location),
        }
    }
}

/// Guard for pages that require a signed-in user.
///
/// Requests without an access token are sent to sign-in. When `required`
/// is given, the token's claimed access level is checked first and pages
/// above the visitor's level redirect to the dashboard. The loader runs
/// with a client bound to the request's cookies; a loader failure that
/// means the token no longer works clears the cookies on the way out.
pub async fn with_auth<T, F, Fut>(
    config: &Config,
    cookie_header: Option<&str>,
    required: Option<AccessLevel>,
    loader: F,
) -> Result<GuardOutcome<T>, ApiError>
where
    F: FnOnce(ApiClient) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let access_token =
        cookie_header.and_then(|header| cookies::extract_cookie_value(header, ACCESS_COOKIE_NAME));
    let Some(access_token) = access_token else {
        debug!("no access token, redirecting to sign-in");
        return Ok(GuardOutcome::redirect(SIGN_IN_ROUTE));
    };

    if let Some(required) = required {
        let claims = match claims::decode_unverified(&access_token) {
            Ok(claims) => claims,
            Err(error) => {
                debug!(%error, "unreadable access token, clearing the session");
                return Ok(GuardOutcome::redirect_with_clear(SIGN_IN_ROUTE));
            }
        };
        if !claims.access_level.grants(required) {
            debug!(
                held = claims.access_level.as_str(),
                required = required.as_str(),
                "access level too low, redirecting to dashboard"
            );
            return Ok(GuardOutcome::redirect(DASHBOARD_ROUTE));
        }
    }

    let client = ApiClient::for_request(config, cookie_header);
    match loader(client).await {
        Ok(data) => Ok(GuardOutcome::Render(data)),
        Err(error) if error.is_auth_token() => {
            debug!("token no longer accepted, clearing the session");
            Ok(GuardOutcome::redirect_with_clear(SIGN_IN_ROUTE))
        }
        Err(error) => Err(error),
    }
}

/// Guard for pages meant only for visitors, such as the sign-in form.
pub async fn with_guest<T, F, Fut>(
    config: &Config,
    cookie_header: Option<&str>,
    loader: F,
) -> Result<GuardOutcome<T>, ApiError>
where
    F: FnOnce(ApiClient) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let signed_in = cookie_header
        .and_then(|header| cookies::extract_cookie_value(header, ACCESS_COOKIE_NAME))
        .is_some();
    if signed_in {
        debug!("already signed in, redirecting to dashboard");
        return Ok(GuardOutcome::redirect(DASHBOARD_ROUTE));
    }
    let client = ApiClient::for_request(config, None);
    loader(client).await.map(GuardOutcome::Render)
}
