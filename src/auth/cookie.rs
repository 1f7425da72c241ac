//! Session cookie transport

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::DeploymentEnv;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "token";

/// Cookie attributes for a deployment environment.
///
/// Production serves a cross-site frontend, so the cookie must be `Secure`
/// with `SameSite=None`; elsewhere it stays strict and works over plain HTTP.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    env: DeploymentEnv,
}

impl CookiePolicy {
    pub fn new(env: DeploymentEnv) -> Self {
        Self { env }
    }

    fn build(&self, value: String) -> Cookie<'static> {
        let same_site = if self.env.is_production() {
            SameSite::None
        } else {
            SameSite::Strict
        };

        Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .secure(self.env.is_production())
            .same_site(same_site)
            .build()
    }

    pub fn attach(&self, jar: CookieJar, token: String) -> CookieJar {
        jar.add(self.build(token))
    }

    /// Expire the session cookie immediately, whether or not the request carried one
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        let mut cookie = self.build(String::new());
        cookie.make_removal();
        jar.add(cookie)
    }

    pub fn read(jar: &CookieJar) -> Option<&str> {
        jar.get(SESSION_COOKIE).map(Cookie::value)
    }
}
