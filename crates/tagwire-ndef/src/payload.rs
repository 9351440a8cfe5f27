use winnow::{
    Parser,
    binary::bits::{bits, bool as take_bool, take as take_bits},
    error::{ContextError, ErrMode},
    token::take,
};

use crate::parser::stream;

/// Decoded payload of a well-known text record
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TextPayload {
    pub format: TextPayloadFormat,
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum TextPayloadFormat {
    Utf8,
    Utf16,
}

impl TextPayload {
    /// Status byte: bit 7 utf-16 flag, bit 6 reserved, bits 5..0 language length
    pub const LANGUAGE_LENGTH_MASK: u8 = 0x3F;

    /// Parse a text record payload, `None` if it is malformed
    pub fn parse(payload: &[u8]) -> Option<Self> {
        let mut input = stream::new(payload);
        let (is_utf16, _reserved, language_length): (bool, bool, u8) =
            bits::<_, _, ErrMode<ContextError>, ErrMode<ContextError>, _>((
                take_bool,
                take_bool,
                take_bits(6_u8),
            ))
            .parse_next(&mut input)
            .ok()?;

        let language = take(language_length as usize)
            .parse_next(&mut input)
            .map_err(|_: ErrMode<ContextError>| ())
            .ok()?;

        if !language.is_ascii() {
            return None;
        }

        let text = &payload[1 + language.len()..];
        let (format, text) = if is_utf16 {
            (TextPayloadFormat::Utf16, decode_utf16(text)?)
        } else {
            (TextPayloadFormat::Utf8, String::from_utf8(text.to_vec()).ok()?)
        };

        Some(Self {
            format,
            language: String::from_utf8_lossy(language).to_string(),
            text,
        })
    }
}

/// Big endian unless a byte order mark says otherwise
fn decode_utf16(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }

    let (little_endian, bytes) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };

    let units = bytes
        .chunks_exact(2)
        .map(|chunk| {
            if little_endian {
                u16::from_le_bytes([chunk[0], chunk[1]])
            } else {
                u16::from_be_bytes([chunk[0], chunk[1]])
            }
        })
        .collect::<Vec<u16>>();

    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_text() {
        let payload = TextPayload::parse(&[0x02, b'e', b'n', b'h', b'i']).unwrap();

        assert_eq!(payload.format, TextPayloadFormat::Utf8);
        assert_eq!(payload.language, "en");
        assert_eq!(payload.text, "hi");
    }

    #[test]
    fn utf16_text_with_and_without_bom() {
        let payload = TextPayload::parse(&[0x82, b'e', b'n', 0x00, b'h', 0x00, b'i']).unwrap();
        assert_eq!(payload.format, TextPayloadFormat::Utf16);
        assert_eq!(payload.text, "hi");

        let payload =
            TextPayload::parse(&[0x82, b'e', b'n', 0xFF, 0xFE, b'h', 0x00, b'i', 0x00]).unwrap();
        assert_eq!(payload.text, "hi");

        let payload =
            TextPayload::parse(&[0x82, b'e', b'n', 0xFE, 0xFF, 0x00, b'h', 0x00, b'i']).unwrap();
        assert_eq!(payload.text, "hi");
    }

    #[test]
    fn reserved_bit_is_not_part_of_the_length() {
        let payload = TextPayload::parse(&[0x42, b'd', b'e', b'x']).unwrap();
        assert_eq!(payload.language, "de");
        assert_eq!(payload.text, "x");
    }

    #[test]
    fn malformed_payloads_yield_none() {
        assert_eq!(TextPayload::parse(&[]), None);

        // language longer than the payload
        assert_eq!(TextPayload::parse(&[0x05, b'e', b'n']), None);

        // odd utf-16 length
        assert_eq!(TextPayload::parse(&[0x80, 0x00]), None);

        // invalid utf-8
        assert_eq!(TextPayload::parse(&[0x00, 0xFF]), None);
    }
}
