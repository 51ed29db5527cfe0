//! Contains the `Authentication` extractor and other authentication related helpers.
//!
//! Session cookies are issued by the account service, which signs them with the same key.
//! This server only reads them: a cookie with a valid signature is the session.

use crate::OctovocState;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{request::Parts, StatusCode},
    RequestPartsExt,
};
use serde::Deserialize;
use std::{borrow::Cow, fmt::Debug};
use tower_cookies::{cookie::SameSite, Cookie, Cookies, SignedCookies};

/// The cookie that is stored signed on the user's browser for authentication.
#[derive(Debug, Deserialize)]
struct SessionCookie {
    user_id: i32,
}

impl SessionCookie {
    /// The name of the cookie in the browser.
    const NAME: &'static str = octovoc_api::SESSION_COOKIE_NAME;

    /// Tries to extract the cookie from signed cookies.
    /// Removes cookies that exist but fail to parse.
    fn from_signed_cookies(signed_cookies: &SignedCookies<'_>) -> Option<Self> {
        let cookie = signed_cookies.get(SessionCookie::NAME)?;
        match serde_json::from_str::<SessionCookie>(cookie.value()) {
            Ok(session_cookie) => Some(session_cookie),
            Err(err) => {
                tracing::warn!("removing malformed session cookie: {err}");
                remove_session_cookie(signed_cookies);
                None
            }
        }
    }
}

/// Extractor used for authentication.
pub struct Authentication {
    pub user_id: i32,
}

impl Debug for Authentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_id)
    }
}

const NOT_LOGGED_IN: (StatusCode, &str) = (StatusCode::UNAUTHORIZED, "Not logged in");

impl FromRequestParts<OctovocState> for Authentication {
    type Rejection = (StatusCode, &'static str);

    /// Reads the user from the signed session cookie.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &OctovocState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = parts.extract::<Cookies>().await?;
        authenticate(&cookies.signed(&state.private_cookie_key)).ok_or(NOT_LOGGED_IN)
    }
}

impl OptionalFromRequestParts<OctovocState> for Authentication {
    type Rejection = (StatusCode, &'static str);

    /// Anonymous requests extract as `None`, other failures are still rejected.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &OctovocState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequestParts<OctovocState>>::from_request_parts(parts, state).await {
            Ok(auth) => Ok(Some(auth)),
            Err(rejection) if rejection == NOT_LOGGED_IN => Ok(None),
            Err(rejection) => Err(rejection),
        }
    }
}

fn authenticate(signed_cookies: &SignedCookies<'_>) -> Option<Authentication> {
    let session_cookie = SessionCookie::from_signed_cookies(signed_cookies)?;
    Some(Authentication {
        user_id: session_cookie.user_id,
    })
}

fn build_cookie(value: impl Into<Cow<'static, str>>) -> Cookie<'static> {
    Cookie::build((SessionCookie::NAME, value))
        .path("/")
        .secure(false)
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

fn remove_session_cookie(signed_cookies: &SignedCookies<'_>) {
    let cookie = build_cookie("");
    signed_cookies.remove(cookie);
}
