use super::Authenticator;
use base64::{engine::general_purpose::STANDARD, Engine};
use subtle::ConstantTimeEq;

const BASIC_SCHEME: &str = "basic";

/// HTTP Basic authentication against one configured username/password pair
#[derive(Clone)]
pub struct BasicAuthenticator {
    username: String,
    password: String,
}

impl BasicAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Decode `Basic <base64(user:pass)>` into its two halves.
fn decode_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    // The password may itself contain ':'
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

impl Authenticator for BasicAuthenticator {
    fn check(&self, authorization: Option<&str>) -> bool {
        let Some((user, pass)) = authorization.and_then(decode_basic) else {
            return false;
        };

        // Compare both halves so timing does not reveal which one mismatched
        let user_ok = secure_compare(&user, &self.username);
        let pass_ok = secure_compare(&pass, &self.password);
        user_ok & pass_ok
    }
}
