uniffi::setup_scaffolding!();

pub mod builder;
pub mod error;
pub mod ffi;
pub mod header;
pub mod message;
pub mod ndef_type;
pub mod parser;
pub mod payload;
pub mod record;
pub mod rtd;
pub mod uri;
pub mod writer;

pub use error::{BuilderError, Field, FlagViolation, NdefError, TnfViolation};
pub use message::NdefMessage;
pub use ndef_type::NdefType;
pub use parser::ParseMode;
pub use payload::{TextPayload, TextPayloadFormat};
pub use record::NdefRecord;
pub use ffi::NdefRecordData;
pub use uri::NdefUri;

/// Largest payload a single record may carry, before and after chunk reassembly
pub const MAX_PAYLOAD_SIZE: usize = 10 * (1 << 20);

/// Largest number of records a message may hold
pub const MAX_RECORDS: usize = 1024;

/// Payloads shorter than this are written with a 1 byte length field
pub const SHORT_RECORD_LIMIT: usize = 256;

/// Decode a complete NDEF message, rejecting trailing bytes
pub fn parse(bytes: &[u8]) -> Result<NdefMessage, NdefError> {
    NdefMessage::parse(bytes)
}

/// Encode a message, MB on the first record and ME on the last
pub fn serialize(message: &NdefMessage) -> Vec<u8> {
    message.to_bytes()
}
