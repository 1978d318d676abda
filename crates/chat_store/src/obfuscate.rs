//! Reversible credential scrambling for values at rest.
//!
//! XOR with a fixed embedded key, then base64. Anyone with this source can
//! reverse it. It only keeps the key from being readable at a glance in the
//! store file and is not encryption.

use base64::{engine::general_purpose, Engine as _};
use tracing::warn;

pub const OBFUSCATION_KEY: &[u8] = b"QuickChatSecure2024";

fn xor_with_key(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .zip(OBFUSCATION_KEY.iter().cycle())
        .map(|(byte, key)| byte ^ key)
        .collect()
}

#[must_use]
pub fn obfuscate(plain: &str) -> String {
    if plain.is_empty() {
        return String::new();
    }
    general_purpose::STANDARD.encode(xor_with_key(plain.as_bytes()))
}

/// Inverse of [`obfuscate`]. Undecodable input yields an empty string.
#[must_use]
pub fn deobfuscate(encoded: &str) -> String {
    if encoded.is_empty() {
        return String::new();
    }
    let decoded = match general_purpose::STANDARD.decode(encoded.trim()) {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!(error = %err, "stored credential is not valid base64; ignoring it");
            return String::new();
        }
    };
    match String::from_utf8(xor_with_key(&decoded)) {
        Ok(plain) => plain,
        Err(_) => {
            warn!("stored credential does not decode to UTF-8; ignoring it");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let key = "AIzaSyD-example_key-0123456789";
        let hidden = obfuscate(key);
        assert_ne!(hidden, key);
        assert!(!hidden.contains("AIza"));
        assert_eq!(deobfuscate(&hidden), key);
    }

    #[test]
    fn matches_known_encoding() {
        // A prefix of the key cancels itself out.
        assert_eq!(obfuscate("Qu"), general_purpose::STANDARD.encode([0u8, 0u8]));
        assert_eq!(obfuscate("abc"), "MBcK");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(obfuscate(""), "");
        assert_eq!(deobfuscate(""), "");
    }

    #[test]
    fn garbage_reads_back_empty() {
        assert_eq!(deobfuscate("%%% not base64 %%%"), "");
        // 0xFF ^ 'Q' is not valid UTF-8 on its own.
        let invalid = general_purpose::STANDARD.encode([0xFF ^ b'Q']);
        assert_eq!(deobfuscate(&invalid), "");
    }
}
