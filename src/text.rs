//! Text normalization of raw key/value bytes.
//!
//! Order matters and is part of the output contract:
//! 1. valid UTF-8 is returned as is;
//! 2. otherwise the bytes are tried as standard (padded) Base64 and, on success,
//!    the decoded bytes are rendered;
//! 3. otherwise the original bytes are rendered.
//! "Rendered" is a lossy UTF-8 conversion with one U+FFFD per invalid byte, the
//! same output a Go JSON encoder produces for such a string.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub fn normalize(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_owned();
    }
    match STANDARD.decode(bytes) {
        Ok(decoded) => lossy(&decoded),
        Err(_) => lossy(bytes),
    }
}

fn lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
        // per byte, not per maximal invalid subpart
        for _ in chunk.invalid() {
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }
    out
}
