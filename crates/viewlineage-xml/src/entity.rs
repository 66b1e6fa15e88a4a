//! XML entity decoding
//!
//! Replaces the five predefined entities and decimal/hexadecimal character
//! references. A lone `&` that does not form an `&...;` span is copied as-is.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#x[0-9A-Fa-f]+|#[0-9]+|[A-Za-z_][A-Za-z0-9._:\-]*);").unwrap()
});

/// Entity decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    #[error("Unknown entity '{token}' at offset {offset}")]
    UnknownEntity {
        /// The offending `&...;` span
        token: String,

        /// 1-based character offset of the span within the decoded text
        offset: usize,
    },
}

/// Decode entity references in `text`
///
/// Text without any `&` is returned borrowed.
pub fn decode(text: &str) -> Result<Cow<'_, str>, EntityError> {
    if !text.contains('&') {
        return Ok(Cow::Borrowed(text));
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in ENTITY_RE.find_iter(text) {
        out.push_str(&text[last..m.start()]);

        let token = m.as_str();
        let body = &token[1..token.len() - 1];
        let ch = resolve(body).ok_or_else(|| EntityError::UnknownEntity {
            token: token.to_string(),
            offset: text[..m.start()].chars().count() + 1,
        })?;
        out.push(ch);

        last = m.end();
    }

    out.push_str(&text[last..]);
    Ok(Cow::Owned(out))
}

/// Character for an entity body (the part between `&` and `;`)
fn resolve(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "apos" => Some('\''),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        _ => {
            if let Some(hex) = body.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                None
            }
        }
    }
}
