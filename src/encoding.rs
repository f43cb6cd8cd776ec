//! Decoding saved pages to UTF-8.
//!
//! Pages saved from the browser are usually UTF-8, but older exports carry
//! a legacy charset declared in a `<meta>` tag. A byte order mark wins over
//! any declaration; otherwise the first declaration in the first 1024 bytes
//! is used, defaulting to UTF-8.

use encoding_rs::{Encoding, UTF_8};

use crate::patterns::META_CHARSET;

/// Bytes scanned for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// Encoding of a saved page.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }
    declared_charset(html)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Charset label from the first `<meta>` declaration, if any.
fn declared_charset(html: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LEN)]);
    META_CHARSET
        .captures(&head)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode page bytes to a UTF-8 string.
///
/// Invalid sequences become U+FFFD; decoding never fails.
///
/// ```
/// use grok_convo_scraper::encoding::transcode_to_utf8;
///
/// let page = b"<meta charset=\"windows-1252\"><p>Caf\xE9</p>";
/// assert!(transcode_to_utf8(page).contains("Caf\u{e9}"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    let (decoded, used, had_errors) = encoding.decode(html);
    if had_errors {
        log::debug!("replaced malformed {} sequences while decoding page", used.name());
    }
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_charset_and_content_type() {
        assert_eq!(detect_encoding(br#"<meta charset="ISO-8859-1">"#).name(), "windows-1252");
        assert_eq!(
            detect_encoding(br#"<meta http-equiv="Content-Type" content="text/html; charset=shift_jis">"#).name(),
            "Shift_JIS"
        );
        assert_eq!(detect_encoding(b"<META CHARSET=utf-8>"), UTF_8);
    }

    #[test]
    fn defaults_to_utf8() {
        assert_eq!(detect_encoding(b"<p>no declaration</p>"), UTF_8);
        assert_eq!(detect_encoding(br#"<meta charset="no-such-charset">"#), UTF_8);
    }

    #[test]
    fn bom_overrides_declaration() {
        let mut page = vec![0xEF, 0xBB, 0xBF];
        page.extend_from_slice(br#"<meta charset="windows-1252"><p>caf"#);
        page.extend_from_slice("\u{e9}".as_bytes());
        assert_eq!(detect_encoding(&page), UTF_8);
        assert!(transcode_to_utf8(&page).ends_with("caf\u{e9}"));
    }

    #[test]
    fn declaration_past_sniff_window_is_ignored() {
        let mut page = vec![b' '; SNIFF_LEN];
        page.extend_from_slice(br#"<meta charset="windows-1252">"#);
        assert_eq!(detect_encoding(&page), UTF_8);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let decoded = transcode_to_utf8(b"<p>Hi \xFF there</p>");
        assert_eq!(decoded, "<p>Hi \u{FFFD} there</p>");
    }

    #[test]
    fn legacy_quotes_decoded() {
        let decoded = transcode_to_utf8(b"<meta charset=\"windows-1252\"><p>\x93Hi\x94</p>");
        assert!(decoded.contains("\u{201C}Hi\u{201D}"));
    }
}
