//! TLV framing of NDEF data in tag memory (NFC Forum Type 2 layout)

use tracing::{debug, trace};
use winnow::{
    ModalResult, Parser,
    binary::{be_u8, be_u16},
    stream::Stream as _,
    token::take,
};

use crate::ndef::{
    NdefError, NdefMessage,
    parser::stream::{self, Stream},
};

pub const NULL_TLV: u8 = 0x00;
pub const LOCK_CONTROL_TLV: u8 = 0x01;
pub const MEMORY_CONTROL_TLV: u8 = 0x02;
pub const NDEF_TLV: u8 = 0x03;
pub const PROPRIETARY_TLV: u8 = 0xFD;
pub const TERMINATOR_TLV: u8 = 0xFE;

/// Length byte announcing a 2 byte length
const LONG_LENGTH: u8 = 0xFF;

/// Largest value a 3 byte TLV length can describe
pub const MAX_TLV_LENGTH: usize = 0xFFFE;

type Result<T, E = TagError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum TagError {
    #[error("unable to decode ndef message: {0}")]
    Decode(#[from] NdefError),

    #[error("tag memory holds no ndef message tlv")]
    NoNdefTlv,

    #[error("tlv truncated at byte {offset}")]
    Truncated { offset: u64 },

    #[error("ndef message of {size} bytes does not fit in a tlv, max {max}", max = MAX_TLV_LENGTH)]
    MessageTooLarge { size: u64 },
}

/// What a tag holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagContent {
    /// Formatted for NDEF but nothing written yet
    Blank,
    Message(NdefMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tlv<'i> {
    Null,
    Terminator,
    Ndef(&'i [u8]),
    Other { tag: u8, length: u16 },
}

/// Find the first NDEF TLV in `memory` and decode it
///
/// A message that fails to decode is an error, never a blank tag.
pub fn read_tag(memory: &[u8]) -> Result<TagContent> {
    let mut input = stream::new(memory);

    loop {
        if input.eof_offset() == 0 {
            return Err(TagError::NoNdefTlv);
        }

        let offset = memory.len() - input.eof_offset();
        let tlv = parse_tlv.parse_next(&mut input).map_err(|_| TagError::Truncated {
            offset: offset as u64,
        })?;

        match tlv {
            Tlv::Null => continue,
            Tlv::Terminator => return Err(TagError::NoNdefTlv),
            Tlv::Other { tag, length } => {
                trace!("skipping tlv {tag:#04x} of {length} bytes at {offset}");
            }
            Tlv::Ndef([]) => {
                debug!("ndef tlv at {offset} is empty");
                return Ok(TagContent::Blank);
            }
            Tlv::Ndef(value) => {
                debug!("ndef tlv at {offset} holds {} bytes", value.len());
                let message = NdefMessage::parse(value)?;
                return Ok(TagContent::Message(message));
            }
        }
    }
}

/// Tag memory image for `message`: the NDEF TLV followed by a terminator
pub fn write_tag(message: &NdefMessage) -> Result<Vec<u8>> {
    let bytes = message.to_bytes();
    if bytes.len() > MAX_TLV_LENGTH {
        return Err(TagError::MessageTooLarge {
            size: bytes.len() as u64,
        });
    }

    let mut tlv = Vec::with_capacity(bytes.len() + 5);
    tlv.push(NDEF_TLV);

    if bytes.len() < LONG_LENGTH as usize {
        tlv.push(bytes.len() as u8);
    } else {
        tlv.push(LONG_LENGTH);
        tlv.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    }

    tlv.extend_from_slice(&bytes);
    tlv.push(TERMINATOR_TLV);

    Ok(tlv)
}

/// Memory image of a formatted tag with an empty NDEF TLV
pub fn blank_tag() -> Vec<u8> {
    vec![NDEF_TLV, 0x00, TERMINATOR_TLV]
}

fn parse_tlv<'i>(input: &mut Stream<'i>) -> ModalResult<Tlv<'i>> {
    let tag = be_u8.parse_next(input)?;

    match tag {
        NULL_TLV => return Ok(Tlv::Null),
        TERMINATOR_TLV => return Ok(Tlv::Terminator),
        _ => {}
    }

    let length = parse_length(input)?;
    let value = take(length as usize).parse_next(input)?;

    let tlv = match tag {
        NDEF_TLV => Tlv::Ndef(value),
        // lock control, memory control, proprietary and anything unknown are skipped
        tag => Tlv::Other { tag, length },
    };

    Ok(tlv)
}

fn parse_length(input: &mut Stream<'_>) -> ModalResult<u16> {
    let length_indicator = be_u8.parse_next(input)?;

    if length_indicator == LONG_LENGTH {
        be_u16.parse_next(input)
    } else {
        Ok(length_indicator as u16)
    }
}
