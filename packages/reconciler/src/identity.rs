use serde::{Deserialize, Serialize};
use std::fmt;

/// Version prefix carried by every identity
pub const IDENTITY_PREFIX: &str = "gbn-v3-";

/// Content-derived fragment identity, `gbn-v3-<base36>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Hash a structural path into an identity
    pub fn from_path(path: &str) -> Self {
        let magnitude = rolling_hash(path).unsigned_abs();
        Identity(format!("{}{}", IDENTITY_PREFIX, to_base36(magnitude)))
    }

    /// Wrap an identity read back from markup or configuration
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Identity(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identity carries the current version prefix
    pub fn is_current(&self) -> bool {
        self.0.starts_with(IDENTITY_PREFIX)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 32-bit `hash * 31 + byte` over the UTF-8 bytes, wrapping at each step
///
/// The sign is dropped by the caller (absolute value), which halves the
/// usable space; kept as-is so identities match ones already persisted.
pub fn rolling_hash(input: &str) -> i32 {
    input.bytes().fold(0i32, |hash, byte| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(byte))
    })
}

/// Lowercase base-36 rendering of an unsigned value
pub fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(7);
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Only ASCII digits were pushed
    String::from_utf8(digits).unwrap_or_default()
}
