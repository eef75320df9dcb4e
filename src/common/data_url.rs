use base64::{engine::general_purpose::STANDARD, Engine};

use super::error::{RenderError, RenderResult};

const DATA_URL_PREFIX: &str = "data:";

/// Wraps bytes into a base64 `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("{DATA_URL_PREFIX}{mime};base64,{}", STANDARD.encode(bytes))
}

/// Decodes a base64 `data:` URL into its payload. Only base64 payloads are
/// accepted since this crate never produces anything else.
pub fn decode_data_url(url: &str) -> RenderResult<Vec<u8>> {
    let rest = url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| RenderError::InvalidDataUrl("missing 'data:' prefix".to_string()))?;
    let (metadata, data) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::InvalidDataUrl("missing comma".to_string()))?;

    let is_base64 = metadata.split(';').skip(1).any(|p| p.trim().eq_ignore_ascii_case("base64"));
    if !is_base64 {
        return Err(RenderError::InvalidDataUrl("payload is not base64".to_string()));
    }

    Ok(STANDARD.decode(data.trim())?)
}

#[cfg(test)]
mod data_url_tests {
    use super::{decode_data_url, encode_data_url};
    use crate::common::error::RenderError;

    #[test]
    fn test_encode() {
        assert_eq!(encode_data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_data_url("data:image/png;base64,YWJj").unwrap(), b"abc");
        assert_eq!(decode_data_url("data:;BASE64,YWJj").unwrap(), b"abc");
    }

    #[test]
    fn test_decode_invalid() {
        let err = decode_data_url("http://example.com/a.png").unwrap_err();
        assert!(matches!(err, RenderError::InvalidDataUrl(_)));
        let err = decode_data_url("data:image/png;base64").unwrap_err();
        assert!(matches!(err, RenderError::InvalidDataUrl(_)));
        let err = decode_data_url("data:text/plain,abc").unwrap_err();
        assert!(matches!(err, RenderError::InvalidDataUrl(_)));
        let err = decode_data_url("data:image/png;base64,@@@").unwrap_err();
        assert!(matches!(err, RenderError::Base64(_)));
    }
}
