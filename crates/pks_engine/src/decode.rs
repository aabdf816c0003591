use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub html: String,
    pub encoding: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to decode page bytes as {encoding}")]
    Malformed { encoding: String },
}

/// Decode raw page bytes into UTF-8: BOM wins, then the Content-Type header
/// charset, then chardetng detection over the full byte stream.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedPage, DecodeError> {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return decode_as(bytes, encoding);
    }

    if let Some(encoding) = content_type
        .and_then(header_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return decode_as(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_as(bytes, detector.guess(None, true))
}

fn header_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let label = value.trim().trim_matches(['"', '\'']);
        (!label.is_empty()).then(|| label.to_string())
    })
}

fn decode_as(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedPage, DecodeError> {
    let (text, actual_encoding, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: actual_encoding.name().to_string(),
        });
    }
    Ok(DecodedPage {
        html: text.into_owned(),
        encoding: actual_encoding.name().to_string(),
    })
}
