use actix_session::Session;
use actix_web::cookie::{Cookie, SameSite};
use rand::Rng;

const SESSION_KEY: &str = "csrf_token";
/// Readable cookie the submission page's script echoes back in [`HEADER_NAME`].
pub const COOKIE_NAME: &str = "csrftoken";
pub const HEADER_NAME: &str = "X-CSRFToken";

/// Get the CSRF token from the session, or generate a new one.
pub fn get_or_create_token(session: &Session) -> String {
    if let Ok(Some(token)) = session.get::<String>(SESSION_KEY) {
        return token;
    }
    let token = generate_token();
    if let Err(e) = session.insert(SESSION_KEY, &token) {
        log::warn!("Could not store CSRF token in session: {e}");
    }
    token
}

/// Cookie exposing the token to the page's JavaScript (not HttpOnly).
pub fn token_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(COOKIE_NAME, token.to_string())
        .path("/")
        .same_site(SameSite::Strict)
        .http_only(false)
        .finish()
}

/// True if `submitted` matches the token stored in the session.
pub fn is_valid(session: &Session, submitted: Option<&str>) -> bool {
    let stored = session
        .get::<String>(SESSION_KEY)
        .unwrap_or(None)
        .unwrap_or_default();
    match submitted {
        Some(submitted) => !stored.is_empty() && constant_time_eq(&stored, submitted),
        None => false,
    }
}

/// Generate a random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_64_hex_chars_and_differ() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn constant_time_eq_compares_content() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
    }

    #[test]
    fn token_cookie_is_script_readable() {
        let cookie = token_cookie("t0k3n");
        assert_eq!(cookie.name(), COOKIE_NAME);
        assert_eq!(cookie.value(), "t0k3n");
        assert_eq!(cookie.http_only(), Some(false));
    }
}
