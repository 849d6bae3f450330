//! Wallet password generation

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/// Random bytes behind a wallet password (256 bits)
pub const PASSWORD_BYTES: usize = 32;

/// Length of a generated password in hex characters
pub const PASSWORD_LEN: usize = PASSWORD_BYTES * 2;

/// Generate a 64 character lowercase hex password from OS randomness
pub fn random_password() -> Zeroizing<String> {
    let mut bytes = Zeroizing::new([0u8; PASSWORD_BYTES]);
    OsRng.fill_bytes(&mut *bytes);
    Zeroizing::new(hex::encode(&*bytes))
}
