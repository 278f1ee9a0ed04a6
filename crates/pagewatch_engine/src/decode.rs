use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use engine_logging::engine_debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
}

/// Decode a response body to UTF-8: BOM -> Content-Type charset -> chardetng guess.
///
/// Malformed sequences are replaced rather than rejected; a page that is still
/// being written may end in the middle of a character.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_label)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        engine_debug!("Body contained invalid {} sequences", encoding.name());
    }
    DecodedBody {
        text: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    }
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_header_wins_over_detection() {
        let decoded = decode_body(b"caf\xe9", Some("text/html; Charset=\"ISO-8859-1\""));
        assert_eq!(decoded.text, "café");
    }

    #[test]
    fn bom_wins_over_header() {
        let decoded = decode_body(b"\xEF\xBB\xBFhello", Some("text/html; charset=iso-8859-1"));
        assert_eq!(decoded.text, "hello");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn truncated_utf8_is_replaced_not_rejected() {
        let mut bytes = "口红".as_bytes().to_vec();
        bytes.pop();
        let decoded = decode_body(&bytes, Some("text/html; charset=utf-8"));
        assert!(decoded.text.starts_with('口'));
        assert!(decoded.text.ends_with('\u{FFFD}'));
    }
}
