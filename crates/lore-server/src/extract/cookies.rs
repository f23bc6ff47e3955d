//! Lore cache cookies.
//!
//! The lore travels as base64 in `lore_cache` and the player profile as
//! base64 JSON in `lore_meta`, so neither value needs cookie escaping.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::extract::TRACING_TARGET;
use crate::handler::response::CachedLore;

/// Cookie holding the base64 lore.
pub const LORE_CACHE_COOKIE: &str = "lore_cache";

/// Cookie holding the base64 JSON profile.
pub const LORE_META_COOKIE: &str = "lore_meta";

/// Lifetime of both cache cookies.
pub const LORE_CACHE_TTL: Duration = Duration::minutes(30);

/// Player profile stored next to the lore.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoreMeta {
    #[serde(default)]
    pub pseudo: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub role: String,
}

fn cache_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(LORE_CACHE_TTL)
        .build()
}

/// Adds the two cookies caching `lore` and `meta` to `jar`.
pub fn cache_cookies(
    jar: CookieJar,
    lore: &str,
    meta: &LoreMeta,
) -> serde_json::Result<CookieJar> {
    let meta = serde_json::to_vec(meta)?;
    Ok(jar
        .add(cache_cookie(LORE_CACHE_COOKIE, STANDARD.encode(lore)))
        .add(cache_cookie(LORE_META_COOKIE, STANDARD.encode(meta))))
}

/// Lore restored from the request cookies, `None` when there is none.
///
/// A missing or undecodable `lore_cache` means nothing is cached. A broken
/// `lore_meta` only loses the profile.
#[derive(Debug, Clone, Default)]
pub struct CookieLore(pub Option<CachedLore>);

impl CookieLore {
    pub fn from_jar(jar: &CookieJar) -> Self {
        let lore = jar
            .get(LORE_CACHE_COOKIE)
            .and_then(|cookie| STANDARD.decode(cookie.value()).ok())
            .and_then(|bytes| String::from_utf8(bytes).ok());

        let Some(lore) = lore else {
            return Self(None);
        };

        let meta = jar
            .get(LORE_META_COOKIE)
            .and_then(|cookie| STANDARD.decode(cookie.value()).ok())
            .and_then(|bytes| serde_json::from_slice::<LoreMeta>(&bytes).ok());

        if meta.is_none() {
            tracing::debug!(target: TRACING_TARGET, "Cached lore has no readable profile");
        }

        let LoreMeta {
            pseudo,
            genre,
            role,
        } = meta.unwrap_or_default();

        Self(Some(CachedLore {
            lore,
            pseudo,
            genre,
            role,
        }))
    }
}

impl<S> FromRequestParts<S> for CookieLore
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_jar(&CookieJar::from_headers(&parts.headers)))
    }
}

impl aide::OperationInput for CookieLore {}

#[cfg(test)]
mod tests {
    use axum::http::header::COOKIE;
    use axum::http::{HeaderMap, HeaderValue};

    use super::*;

    /// Replays the jar's cookies as a request `Cookie` header.
    fn request_jar(written: &CookieJar) -> anyhow::Result<CookieJar> {
        let pairs: Vec<String> = written
            .iter()
            .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
            .collect();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&pairs.join("; "))?);
        Ok(CookieJar::from_headers(&headers))
    }

    #[test]
    fn cookies_carry_attributes() -> anyhow::Result<()> {
        let jar = cache_cookies(CookieJar::new(), "Wolf: hi", &LoreMeta::default())?;

        let lore = jar
            .get(LORE_CACHE_COOKIE)
            .ok_or_else(|| anyhow::anyhow!("lore cookie missing"))?;
        assert_eq!(lore.value(), "V29sZjogaGk=");
        assert_eq!(lore.path(), Some("/"));
        assert_eq!(lore.http_only(), Some(true));
        assert_eq!(lore.secure(), Some(true));
        assert_eq!(lore.same_site(), Some(SameSite::Lax));
        assert_eq!(lore.max_age(), Some(Duration::seconds(1800)));
        assert!(jar.get(LORE_META_COOKIE).is_some());
        Ok(())
    }

    #[test]
    fn written_cookies_read_back() -> anyhow::Result<()> {
        let meta = LoreMeta {
            pseudo: "Sona#Zusa".into(),
            genre: "tragedy".into(),
            role: "support".into(),
        };
        let written = cache_cookies(CookieJar::new(), "Lamb: ¿quién?", &meta)?;

        let CookieLore(cached) = CookieLore::from_jar(&request_jar(&written)?);
        let cached = cached.ok_or_else(|| anyhow::anyhow!("nothing cached"))?;
        assert_eq!(cached.lore, "Lamb: ¿quién?");
        assert_eq!(cached.pseudo, "Sona#Zusa");
        assert_eq!(cached.role, "support");
        Ok(())
    }

    #[test]
    fn empty_jar_has_nothing_cached() {
        let CookieLore(cached) = CookieLore::from_jar(&CookieJar::new());
        assert!(cached.is_none());
    }
}
