use bitflags::bitflags;

use crate::{SHORT_RECORD_LIMIT, ndef_type::NdefType, record::NdefRecord};

bitflags! {
    /// Upper 5 bits of a record's flag byte, the TNF lives in the low 3
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RecordFlags: u8 {
        const MESSAGE_BEGIN = 0x80;
        const MESSAGE_END   = 0x40;

        /// More chunks of the same record follow
        const CHUNK         = 0x20;

        /// Payload length is 1 byte instead of 4
        const SHORT_RECORD  = 0x10;
        const ID_LENGTH     = 0x08;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefHeader {
    pub flags: RecordFlags,
    pub type_name_format: NdefType,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

impl RecordFlags {
    /// Split a raw flag byte into flags and TNF
    pub fn split(byte: u8) -> (Self, NdefType) {
        (
            Self::from_bits_truncate(byte),
            NdefType::from_flag_byte(byte),
        )
    }

    pub fn message_begin(self) -> bool {
        self.contains(Self::MESSAGE_BEGIN)
    }

    pub fn message_end(self) -> bool {
        self.contains(Self::MESSAGE_END)
    }

    pub fn chunked(self) -> bool {
        self.contains(Self::CHUNK)
    }

    pub fn short_record(self) -> bool {
        self.contains(Self::SHORT_RECORD)
    }

    pub fn has_id_length(self) -> bool {
        self.contains(Self::ID_LENGTH)
    }
}

impl NdefHeader {
    /// Header the writer emits for `record`, never chunked
    pub fn for_record(record: &NdefRecord, message_begin: bool, message_end: bool) -> Self {
        let payload_length = record.payload().len();

        let mut flags = RecordFlags::empty();
        flags.set(RecordFlags::MESSAGE_BEGIN, message_begin);
        flags.set(RecordFlags::MESSAGE_END, message_end);
        flags.set(RecordFlags::SHORT_RECORD, payload_length < SHORT_RECORD_LIMIT);

        // an empty record always carries an id length byte, even though it is 0
        let id_length = if record.tnf() == NdefType::Empty || !record.id().is_empty() {
            flags.insert(RecordFlags::ID_LENGTH);
            Some(record.id().len() as u8)
        } else {
            None
        };

        Self {
            flags,
            type_name_format: record.tnf(),
            type_length: record.type_().len() as u8,
            payload_length: payload_length as u32,
            id_length,
        }
    }

    pub fn flag_byte(&self) -> u8 {
        self.flags.bits() | self.type_name_format.as_u8()
    }

    /// Number of bytes the header occupies on the wire
    pub fn encoded_len(&self) -> usize {
        let payload_length_len = if self.flags.short_record() { 1 } else { 4 };
        let id_length_len = if self.id_length.is_some() { 1 } else { 0 };

        2 + payload_length_len + id_length_len
    }
}
