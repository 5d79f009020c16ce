//! Payload encoding: PDF bytes → base64 `inline_data` part.
//!
//! The generative-language API accepts documents inline in the JSON request
//! body as a base64 string with a MIME type. Base64 inflates the payload by
//! roughly a third, which is fine for the paper-sized documents this tool
//! targets; there is no chunked upload path in this exchange.

use crate::pipeline::gemini::{InlineData, Part};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// MIME type attached to the inline document payload.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Encode raw PDF bytes as an inline-data request part.
pub fn encode_pdf(bytes: &[u8]) -> Part {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded PDF → {} bytes base64", b64.len());

    Part {
        text: None,
        inline_data: Some(InlineData {
            mime_type: PDF_MIME_TYPE.to_string(),
            data: b64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_small_document() {
        let part = encode_pdf(b"%PDF-1.7 tiny");
        let inline = part.inline_data.expect("inline data present");
        assert_eq!(inline.mime_type, "application/pdf");
        assert!(part.text.is_none());
        // Verify it round-trips as valid base64
        let decoded = STANDARD.decode(&inline.data).expect("valid base64");
        assert_eq!(decoded, b"%PDF-1.7 tiny");
    }

    #[test]
    fn encode_empty_is_empty_base64() {
        let part = encode_pdf(b"");
        assert_eq!(part.inline_data.unwrap().data, "");
    }
}
