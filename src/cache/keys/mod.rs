// Cache key builders.
use sha2::{Digest, Sha256};

const BLACKLIST_PREFIX: &str = "blacklist:";
const OTP_PREFIX: &str = "otp:";

/// Value stored under a blacklist key.
pub const BLACKLIST_MARKER: &str = "blacklisted";

/// Tokens are hashed so key length stays fixed regardless of claim size.
pub fn blacklist_key(token: &str) -> String {
    format!("{}{:x}", BLACKLIST_PREFIX, Sha256::digest(token.as_bytes()))
}

/// Keyed by the exact address, matching the case-sensitive `users.email` column.
pub fn otp_key(email: &str) -> String {
    format!("{}{}", OTP_PREFIX, email)
}
