// Text decoding with an ordered encoding fallback chain.
//
// Sources arrive from Excel exports, legacy Windows tools and Unix scripts,
// so the same column may be UTF-8, UTF-8 with a byte-order mark, or a
// single-byte Cyrillic codepage. Each attempt is strict: an encoding either
// decodes the whole buffer without replacement characters or it fails and
// the next one is tried.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    /// UTF-8 without a byte-order mark.
    #[serde(rename = "utf-8")]
    Utf8,
    /// UTF-8 prefixed with a byte-order mark (Excel "CSV UTF-8").
    #[serde(rename = "utf-8-sig")]
    Utf8Sig,
    #[serde(rename = "windows-1251")]
    Windows1251,
    /// ISO-8859-1. Never fails, so it belongs at the end of a chain.
    #[serde(rename = "latin-1")]
    Latin1,
}

impl TextEncoding {
    pub const DEFAULT_CHAIN: [TextEncoding; 4] = [
        TextEncoding::Utf8,
        TextEncoding::Utf8Sig,
        TextEncoding::Windows1251,
        TextEncoding::Latin1,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Sig => "utf-8-sig",
            Self::Windows1251 => "windows-1251",
            Self::Latin1 => "latin-1",
        }
    }

    /// Parse a user-facing encoding name. Accepts the common aliases.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "utf-8-sig" | "utf8-sig" | "utf-8-bom" => Some(Self::Utf8Sig),
            "windows-1251" | "cp1251" | "win1251" => Some(Self::Windows1251),
            "latin-1" | "latin1" | "iso-8859-1" => Some(Self::Latin1),
            _ => None,
        }
    }

    /// Decode `bytes` strictly. `None` means this encoding does not fit.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => {
                if bytes.starts_with(UTF8_BOM) {
                    return None;
                }
                strict(encoding_rs::UTF_8, bytes)
            }
            Self::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM)?;
                strict(encoding_rs::UTF_8, body)
            }
            Self::Windows1251 => {
                // 0x98 is unassigned in the Microsoft table; the WHATWG index
                // maps it to U+0098, which would make this step never fail.
                if bytes.contains(&0x98) {
                    return None;
                }
                strict(encoding_rs::WINDOWS_1251, bytes)
            }
            // encoding_rs folds the latin-1 label into windows-1252; ISO-8859-1
            // proper maps every byte onto U+0000..U+00FF.
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn strict(encoding: &'static encoding_rs::Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

/// Successful decode plus the trail of attempts that led to it.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub encoding: TextEncoding,
    /// Every encoding tried, in order, ending with `encoding`.
    pub attempts: Vec<TextEncoding>,
}

/// Try the declared hint (if any), then each chain entry in order.
///
/// Returns the list of attempted encodings on total failure.
pub fn decode(
    bytes: &[u8],
    hint: Option<TextEncoding>,
    chain: &[TextEncoding],
) -> Result<Decoded, Vec<TextEncoding>> {
    let mut attempts = Vec::with_capacity(chain.len() + 1);
    let order = hint.into_iter().chain(chain.iter().copied());

    for encoding in order {
        if attempts.contains(&encoding) {
            continue;
        }
        attempts.push(encoding);
        if let Some(text) = encoding.decode(bytes) {
            return Ok(Decoded { text, encoding, attempts });
        }
    }

    Err(attempts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8_wins_first() {
        let decoded = decode("Привет".as_bytes(), None, &TextEncoding::DEFAULT_CHAIN).unwrap();
        assert_eq!(decoded.text, "Привет");
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert_eq!(decoded.attempts, vec![TextEncoding::Utf8]);
    }

    #[test]
    fn bom_prefixed_utf8_uses_sig_and_drops_marker() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"doc_num\nA1\n");
        let decoded = decode(&bytes, None, &TextEncoding::DEFAULT_CHAIN).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf8Sig);
        assert_eq!(decoded.text, "doc_num\nA1\n");
        assert_eq!(decoded.attempts, vec![TextEncoding::Utf8, TextEncoding::Utf8Sig]);
    }

    #[test]
    fn cyrillic_codepage_fallback() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode("Нарушение");
        let decoded = decode(&bytes, None, &TextEncoding::DEFAULT_CHAIN).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Windows1251);
        assert_eq!(decoded.text, "Нарушение");
    }

    #[test]
    fn latin1_catches_undefined_cp1251_byte() {
        // 0x98 is unassigned in windows-1251 and invalid as a UTF-8 start byte.
        let bytes = [b'A', 0x98, b'B'];
        let decoded = decode(&bytes, None, &TextEncoding::DEFAULT_CHAIN).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Latin1);
        assert_eq!(decoded.text.chars().count(), 3);
    }

    #[test]
    fn exhausted_chain_reports_attempts() {
        let bytes = [b'A', 0x98, b'B'];
        let chain = [TextEncoding::Utf8, TextEncoding::Windows1251];
        let tried = decode(&bytes, None, &chain).unwrap_err();
        assert_eq!(tried, chain.to_vec());
    }

    #[test]
    fn hint_is_tried_first_and_not_repeated() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode("Штраф");
        let decoded =
            decode(&bytes, Some(TextEncoding::Windows1251), &TextEncoding::DEFAULT_CHAIN).unwrap();
        assert_eq!(decoded.attempts, vec![TextEncoding::Windows1251]);

        let tried = decode(&[0x98], Some(TextEncoding::Utf8), &[TextEncoding::Utf8]).unwrap_err();
        assert_eq!(tried, vec![TextEncoding::Utf8]);
    }

    #[test]
    fn labels_round_trip_through_aliases() {
        assert_eq!(TextEncoding::from_label("CP1251"), Some(TextEncoding::Windows1251));
        assert_eq!(TextEncoding::from_label("latin1"), Some(TextEncoding::Latin1));
        assert_eq!(TextEncoding::from_label("koi8-r"), None);
        for enc in TextEncoding::DEFAULT_CHAIN {
            assert_eq!(TextEncoding::from_label(enc.label()), Some(enc));
        }
    }
}
