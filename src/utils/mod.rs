use bcrypt::{hash, verify};
use rand::Rng;

pub mod token;

pub use token::{Claims, IssuedToken, TokenIssuer, TokenKind};

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), cost)
}

/// bcrypt compares digests in constant time.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// Six-digit, zero-padded reset code from the thread-local CSPRNG.
pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", code)
}
