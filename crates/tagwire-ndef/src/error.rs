use crate::{MAX_PAYLOAD_SIZE, MAX_RECORDS, ndef_type::NdefType};

pub type Result<T, E = NdefError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum NdefError {
    /// Ran out of bytes in the middle of a field
    #[error("input truncated at byte {offset} while reading {field}{}", fmt_needed(.needed))]
    TruncatedInput {
        offset: u64,
        field: Field,
        needed: Option<u64>,
    },

    #[error("invalid flag sequence in record {record}: {reason}")]
    InvalidFlagSequence { record: u32, reason: FlagViolation },

    #[error("invalid record fields: {0}")]
    InvalidTnfForFields(TnfViolation),

    #[error("payload size {size} larger than limit {limit}", limit = MAX_PAYLOAD_SIZE)]
    PayloadTooLarge { size: u64 },

    #[error("{remaining} bytes of trailing data after message end at byte {offset}")]
    TrailingData { offset: u64, remaining: u64 },

    #[error("message must hold between 1 and {max} records, found {count}", max = MAX_RECORDS)]
    InvalidRecordCount { count: u64 },

    #[error("malformed builder input: {0}")]
    MalformedBuilderInput(BuilderError),
}

fn fmt_needed(needed: &Option<u64>) -> String {
    match needed {
        Some(needed) => format!(", {needed} more bytes needed"),
        None => String::new(),
    }
}

/// The part of a record being read when the input ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Field {
    #[display("flags")]
    Flags,

    #[display("type length")]
    TypeLength,

    #[display("payload length")]
    PayloadLength,

    #[display("id length")]
    IdLength,

    #[display("type")]
    Type,

    #[display("id")]
    Id,

    #[display("payload")]
    Payload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FlagViolation {
    #[display("expected MessageBegin flag on the first record")]
    MissingMessageBegin,

    #[display("MessageBegin flag on a record that is not the first")]
    UnexpectedMessageBegin,

    #[display("MessageEnd flag on a non-trailing record chunk")]
    MessageEndInChunk,

    #[display("IdLength flag on a non-leading record chunk")]
    IdLengthInChunk,

    #[display("expected TNF_UNCHANGED on a non-leading record chunk, found {_0}")]
    ChunkNotUnchanged(NdefType),

    #[display("TNF_UNCHANGED on a first chunk or unchunked record")]
    UnchangedOutsideChunk,

    #[display("expected zero-length type on a non-leading record chunk, found {_0}")]
    TypeLengthInChunk(u8),

    #[display("expected non-zero type length on the first record chunk")]
    FirstChunkMissingType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TnfViolation {
    #[display("TNF_EMPTY record must have empty type, id and payload")]
    EmptyWithData,

    #[display("{_0} record must have an empty type")]
    TypeNotAllowed(NdefType),

    #[display("TNF_UNCHANGED in first chunk or logical record")]
    Unchanged,

    #[display("type name format value out of range: {_0:#04x}")]
    OutOfRange(u8),

    #[display("type is {_0} bytes, at most 255 fit in a record")]
    TypeTooLong(usize),

    #[display("id is {_0} bytes, at most 255 fit in a record")]
    IdTooLong(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderError {
    #[display("mime type is empty")]
    EmptyMimeType,

    #[display("mime type must contain '/': {_0}")]
    MissingMimeSeparator(String),

    #[display("mime type must have a major type: {_0}")]
    MissingMajorType(String),

    #[display("mime type must have a minor type: {_0}")]
    MissingMinorType(String),

    #[display("mime type must be ascii: {_0}")]
    NonAsciiMimeType(String),

    #[display("external domain is empty")]
    EmptyDomain,

    #[display("external type is empty")]
    EmptyExternalType,

    #[display("language code is too long, must be < 64 bytes, found {_0}")]
    LanguageCodeTooLong(usize),

    #[display("language code must be ascii: {_0}")]
    NonAsciiLanguageCode(String),

    #[display("package name is empty")]
    EmptyPackageName,

    #[display("uri is empty")]
    EmptyUri,
}

impl From<TnfViolation> for NdefError {
    fn from(violation: TnfViolation) -> Self {
        Self::InvalidTnfForFields(violation)
    }
}

impl From<BuilderError> for NdefError {
    fn from(error: BuilderError) -> Self {
        Self::MalformedBuilderInput(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_message_mentions_missing_bytes() {
        let error = NdefError::TruncatedInput {
            offset: 3,
            field: Field::Payload,
            needed: Some(4),
        };

        assert_eq!(
            error.to_string(),
            "input truncated at byte 3 while reading payload, 4 more bytes needed"
        );

        let error = NdefError::TruncatedInput {
            offset: 0,
            field: Field::Flags,
            needed: None,
        };

        assert_eq!(error.to_string(), "input truncated at byte 0 while reading flags");
    }

    #[test]
    fn out_of_range_tnf_reports_value() {
        let error = NdefError::from(TnfViolation::OutOfRange(9));
        assert_eq!(error.to_string(), "invalid record fields: type name format value out of range: 0x09");
    }
}
