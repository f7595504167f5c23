//! Minimal standard base64 encoder.
//!
//! Samsung TVs expect the remote's display name base64-encoded in the channel
//! URL.  That is the only place base64 is needed, so a 20-line encoder is kept
//! here instead of pulling in a dedicated crate.

/// Encodes `data` with the standard RFC 4648 alphabet, with `=` padding.
///
/// # Examples
///
/// ```rust
/// use tvremote_core::protocol::base64_encode;
///
/// assert_eq!(base64_encode(b"SmartRemote"), "U21hcnRSZW1vdGU=");
/// ```
pub fn base64_encode(data: &[u8]) -> String {
    const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut out = String::with_capacity((data.len() + 2) / 3 * 4);

    for chunk in data.chunks(3) {
        // Pack up to three bytes into the high 24 bits of a word.
        let word = chunk
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &b)| acc | (u32::from(b) << (16 - 8 * i)));

        for i in 0..4 {
            if i <= chunk.len() {
                let index = (word >> (18 - 6 * i)) & 0x3F;
                out.push(char::from(ALPHABET[index as usize]));
            } else {
                out.push('=');
            }
        }
    }

    out
}
