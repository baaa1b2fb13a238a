// Utility functions and helpers

use rand::Rng;

/// Characters drawn from when generating share tokens.
///
/// Some characters appear twice, which skews the distribution slightly
/// toward them. Existing tokens were minted from this exact set.
pub const SHARE_TOKEN_ALPHABET: &[u8] =
    b"qwertyuioplkjhgfdsazxcvbnm0987654321mnbvcxzlkjhgfdsapoiuytrewwq1234567890";

/// Generate an opaque random string of `length` characters.
///
/// Each character is chosen uniformly from [`SHARE_TOKEN_ALPHABET`].
pub fn random_token(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| SHARE_TOKEN_ALPHABET[rng.gen_range(0..SHARE_TOKEN_ALPHABET.len())] as char)
        .collect()
}
