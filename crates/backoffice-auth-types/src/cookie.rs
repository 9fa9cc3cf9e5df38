//! Cookie builders for the admin session credential.
//!
//! The cookie is HTTP-only, same-site lax and scoped to the whole application
//! path. `Secure` and `Domain` come from [`CookieSettings`].

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the admin session token.
pub const SESSION_COOKIE: &str = "admin_session";

/// Deployment-dependent cookie attributes.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// `Domain` attribute; `None` yields a host-only cookie.
    pub domain: Option<String>,
    /// `Secure` attribute. Disable only for plain-HTTP local development.
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            domain: None,
            secure: true,
        }
    }
}

fn build(value: String, max_age: Duration, settings: &CookieSettings) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax);
    if let Some(domain) = &settings.domain {
        builder = builder.domain(domain.clone());
    }
    builder.build()
}

/// Read the session token from the jar, ignoring empty values.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

/// Set the session cookie on the jar with `Max-Age` equal to the session TTL.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use backoffice_auth_types::cookie::{set_session_cookie, CookieSettings, SESSION_COOKIE};
///
/// let settings = CookieSettings { domain: Some("example.com".into()), secure: true };
/// let jar = set_session_cookie(CookieJar::new(), "token".to_string(), 86_400, &settings);
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86_400)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(
    jar: CookieJar,
    token: String,
    max_age_secs: i64,
    settings: &CookieSettings,
) -> CookieJar {
    jar.add(build(token, Duration::seconds(max_age_secs), settings))
}

/// Overwrite the session cookie with an empty, immediately expiring value.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use backoffice_auth_types::cookie::{
///     clear_session_cookie, set_session_cookie, CookieSettings, SESSION_COOKIE,
/// };
///
/// let settings = CookieSettings::default();
/// let jar = set_session_cookie(CookieJar::new(), "t".to_string(), 60, &settings);
/// let jar = clear_session_cookie(jar, &settings);
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, settings: &CookieSettings) -> CookieJar {
    jar.add(build(String::new(), Duration::ZERO, settings))
}
