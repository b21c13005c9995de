use rand::{Rng, distributions::Alphanumeric};

/// Length of every server-issued credential: session tokens and
/// transaction audit tokens alike.
pub const TOKEN_LEN: usize = 32;

/// Fresh random alphanumeric credential.
pub fn generate() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
