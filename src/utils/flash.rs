//! One-shot notices carried across a redirect in a signed cookie.

use actix_web::cookie::{Cookie, CookieJar, Key};
use actix_web::HttpRequest;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const FLASH_COOKIE: &str = "_flash";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FlashMessage {
    pub message: String,
}

/// Derives the cookie signing key from the configured secret.
pub fn signing_key(secret: &str) -> Key {
    let digest: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
    Key::derive_from(&digest)
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        FlashMessage { message: message.into() }
    }

    pub fn to_cookie(&self, key: &Key) -> Option<Cookie<'static>> {
        // hex keeps the value inside the cookie-safe character set
        let value = hex::encode(serde_json::to_vec(self).ok()?);
        let cookie = Cookie::build(FLASH_COOKIE, value)
            .path("/")
            .http_only(true)
            .finish();

        let mut jar = CookieJar::new();
        jar.signed_mut(key).add(cookie);
        jar.get(FLASH_COOKIE).cloned()
    }

    /// Reads the pending message. Unsigned or tampered cookies are ignored.
    pub fn from_request(req: &HttpRequest, key: &Key) -> Option<FlashMessage> {
        let cookie = req.cookie(FLASH_COOKIE)?;

        let mut jar = CookieJar::new();
        jar.add_original(cookie);
        let verified = jar.signed(key).get(FLASH_COOKIE)?;

        let bytes = hex::decode(verified.value()).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Cookie that clears a consumed flash message.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}
