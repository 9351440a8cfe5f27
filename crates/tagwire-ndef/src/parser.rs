pub mod stream;

use stream::{Cursor, Stream};
use tracing::trace;
use winnow::{
    Parser,
    binary::{be_u8, be_u32},
    error::{ContextError, ErrMode},
    token::take,
};

use crate::{
    MAX_PAYLOAD_SIZE, MAX_RECORDS,
    error::{Field, FlagViolation, NdefError, Result},
    header::{NdefHeader, RecordFlags},
    ndef_type::NdefType,
    record::NdefRecord,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// A full message: MB on the first record, stop at ME
    #[default]
    Message,

    /// One record out of context: MB and ME are ignored, stop after the first record
    Standalone,
}

/// Parse every record of `bytes`, failing on any byte left over
pub fn parse_records(bytes: &[u8], mode: ParseMode) -> Result<Vec<NdefRecord>> {
    let mut cursor = Cursor::new(bytes);
    let records = read_records(&mut cursor, mode)?;

    if !cursor.is_empty() {
        return Err(NdefError::TrailingData {
            offset: cursor.offset() as u64,
            remaining: cursor.remaining() as u64,
        });
    }

    Ok(records)
}

/// Parse a single record from the start of `bytes`, for containers that embed
/// records back to back. Returns the record and the number of bytes it used.
pub fn parse_embedded_record(bytes: &[u8]) -> Result<(NdefRecord, usize)> {
    let mut cursor = Cursor::new(bytes);
    let records = read_records(&mut cursor, ParseMode::Standalone)?;

    Ok((first_record(records)?, cursor.offset()))
}

/// The record a standalone parse produced
pub fn first_record(records: Vec<NdefRecord>) -> Result<NdefRecord> {
    records
        .into_iter()
        .next()
        .ok_or(NdefError::InvalidRecordCount { count: 0 })
}

fn read_records(cursor: &mut Cursor<'_>, mode: ParseMode) -> Result<Vec<NdefRecord>> {
    let mut records: Vec<NdefRecord> = Vec::new();
    let mut chunk: Option<ChunkedRecord> = None;

    loop {
        let record_index = records.len() as u32;
        let flag_error = |reason: FlagViolation| NdefError::InvalidFlagSequence {
            record: record_index,
            reason,
        };

        let (flags, tnf) = cursor.read(Field::Flags, be_u8.map(RecordFlags::split))?;
        check_flags(flags, tnf, chunk.is_some(), records.len(), mode).map_err(flag_error)?;

        let header = read_header(cursor, flags, tnf)?;
        if chunk.is_some() && header.type_length != 0 {
            return Err(flag_error(FlagViolation::TypeLengthInChunk(header.type_length)));
        }

        // continuation chunks reuse the type and id of the first chunk
        let (type_, id) = if chunk.is_none() {
            let type_ = cursor.read(Field::Type, take_vec(header.type_length))?;
            let id = cursor.read(Field::Id, take_vec(header.id_length.unwrap_or(0)))?;
            (type_, id)
        } else {
            (Vec::new(), Vec::new())
        };

        check_payload_size(header.payload_length as usize)?;
        let payload = cursor.read(Field::Payload, take_vec(header.payload_length))?;

        let record = match (flags.chunked(), chunk.take()) {
            (true, None) => {
                if type_.is_empty() && tnf != NdefType::Unknown {
                    return Err(flag_error(FlagViolation::FirstChunkMissingType));
                }

                trace!("record {record_index} starts a chunk sequence");
                chunk = Some(ChunkedRecord::start(tnf, type_, id, payload));
                continue;
            }
            (true, Some(mut pending)) => {
                pending.push(payload)?;
                chunk = Some(pending);
                continue;
            }
            (false, Some(pending)) => pending.finish(payload)?,
            (false, None) => NdefRecord::new(tnf, type_, id, payload)?,
        };

        records.push(record);
        if records.len() > MAX_RECORDS {
            return Err(NdefError::InvalidRecordCount {
                count: records.len() as u64,
            });
        }

        if mode == ParseMode::Standalone || flags.message_end() {
            break;
        }
    }

    Ok(records)
}

fn read_header(cursor: &mut Cursor<'_>, flags: RecordFlags, tnf: NdefType) -> Result<NdefHeader> {
    let type_length = cursor.read(Field::TypeLength, be_u8)?;

    let payload_length = if flags.short_record() {
        cursor.read(Field::PayloadLength, be_u8.map(u32::from))?
    } else {
        cursor.read(Field::PayloadLength, be_u32)?
    };

    let id_length = if flags.has_id_length() {
        Some(cursor.read(Field::IdLength, be_u8)?)
    } else {
        None
    };

    Ok(NdefHeader {
        flags,
        type_name_format: tnf,
        type_length,
        payload_length,
        id_length,
    })
}

/// Flag legality for a frame given what has been parsed so far
fn check_flags(
    flags: RecordFlags,
    tnf: NdefType,
    in_chunk: bool,
    records_so_far: usize,
    mode: ParseMode,
) -> Result<(), FlagViolation> {
    let check_bounds = mode == ParseMode::Message;

    if check_bounds && !flags.message_begin() && records_so_far == 0 && !in_chunk {
        return Err(FlagViolation::MissingMessageBegin);
    }

    if check_bounds && flags.message_begin() && (records_so_far != 0 || in_chunk) {
        return Err(FlagViolation::UnexpectedMessageBegin);
    }

    if flags.chunked() && flags.message_end() {
        return Err(FlagViolation::MessageEndInChunk);
    }

    if in_chunk && flags.has_id_length() {
        return Err(FlagViolation::IdLengthInChunk);
    }

    if in_chunk && tnf != NdefType::Unchanged {
        return Err(FlagViolation::ChunkNotUnchanged(tnf));
    }

    if !in_chunk && tnf == NdefType::Unchanged {
        return Err(FlagViolation::UnchangedOutsideChunk);
    }

    Ok(())
}

fn check_payload_size(size: usize) -> Result<()> {
    if size > MAX_PAYLOAD_SIZE {
        return Err(NdefError::PayloadTooLarge { size: size as u64 });
    }

    Ok(())
}

fn take_vec<'i>(
    length: impl Into<u32>,
) -> impl Parser<Stream<'i>, Vec<u8>, ErrMode<ContextError>> {
    take(length.into() as usize).map(|bytes: &[u8]| bytes.to_vec())
}

/// Record being reassembled from its chunks, keeps the TNF, type and id of the first chunk
#[derive(Debug)]
struct ChunkedRecord {
    tnf: NdefType,
    type_: Vec<u8>,
    id: Vec<u8>,
    payload: Vec<u8>,
    chunks: usize,
}

impl ChunkedRecord {
    fn start(tnf: NdefType, type_: Vec<u8>, id: Vec<u8>, payload: Vec<u8>) -> Self {
        Self {
            tnf,
            type_,
            id,
            payload,
            chunks: 1,
        }
    }

    fn push(&mut self, fragment: Vec<u8>) -> Result<()> {
        check_payload_size(self.payload.len() + fragment.len())?;

        self.payload.extend_from_slice(&fragment);
        self.chunks += 1;
        Ok(())
    }

    fn finish(mut self, last: Vec<u8>) -> Result<NdefRecord> {
        self.push(last)?;
        trace!(
            "reassembled {} byte payload from {} chunks",
            self.payload.len(),
            self.chunks
        );

        NdefRecord::new(self.tnf, self.type_, self.id, self.payload)
    }
}
