//! A toy symmetric string obfuscator.
//!
//! Every byte of the UTF-8 text is rotated by a fixed shift, the result is base64
//! encoded and a marker prefix is prepended so obfuscated values can be told apart
//! from plain ones. This hides strings from a casual glance and nothing more.

use crate::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use ohno::{IntoAppError, bail};

/// Marker that starts every obfuscated string.
pub const PREFIX: &str = "%%%%%";

/// Byte rotation used when none is given.
pub const DEFAULT_SHIFT: u8 = 37;

/// Obfuscate `text` by rotating each byte by `shift`.
#[must_use]
pub fn encrypt(text: &str, shift: u8) -> String {
    let rotated: Vec<u8> = text.bytes().map(|b| b.wrapping_add(shift)).collect();
    format!("{PREFIX}{}", BASE64.encode(rotated))
}

/// Reverse [`encrypt`] with the same `shift`.
pub fn decrypt(text: &str, shift: u8) -> Result<String> {
    let Some(payload) = text.strip_prefix(PREFIX) else {
        bail!("value is not obfuscated: missing '{PREFIX}' prefix");
    };

    let rotated = BASE64.decode(payload.trim()).into_app_err("decoding obfuscated payload")?;
    let bytes: Vec<u8> = rotated.into_iter().map(|b| b.wrapping_sub(shift)).collect();

    String::from_utf8(bytes).into_app_err("obfuscated payload is not valid UTF-8 (wrong shift?)")
}

#[must_use]
pub fn is_encrypted(text: &str) -> bool {
    text.starts_with(PREFIX)
}
