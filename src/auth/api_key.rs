use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;

/// Request header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Random bytes per key: 256 bits of entropy.
const API_KEY_BYTES: usize = 32;

/// Generates a new API key.
///
/// 32 bytes from the thread-local CSPRNG, base64url-encoded without padding, which
/// yields a 43 character token that is safe in headers and URLs. Uniqueness is
/// guaranteed by the `api_keys.api_key` constraint, not by this function.
pub fn generate_api_key() -> String {
    let random_bytes: [u8; API_KEY_BYTES] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(random_bytes)
}
