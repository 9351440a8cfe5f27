use tracing::debug;

use crate::{
    MAX_RECORDS,
    error::{NdefError, Result},
    parser::{self, ParseMode},
    record::NdefRecord,
    writer,
};

/// An ordered, non-empty list of records
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn try_new(records: Vec<NdefRecord>) -> Result<Self> {
        if records.is_empty() || records.len() > MAX_RECORDS {
            return Err(NdefError::InvalidRecordCount {
                count: records.len() as u64,
            });
        }

        Ok(Self { records })
    }

    /// Decode a complete message, any error means no message at all
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        debug!("parsing ndef message of {} bytes", bytes.len());

        let records = parser::parse_records(bytes, ParseMode::Message)?;
        debug!("parsed {} records", records.len());

        Ok(Self { records })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        writer::write_message(self)
    }

    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<NdefRecord> {
        self.records
    }

    pub fn encoded_len(&self) -> usize {
        self.records.iter().map(NdefRecord::encoded_len).sum()
    }
}

impl From<NdefRecord> for NdefMessage {
    fn from(record: NdefRecord) -> Self {
        Self {
            records: vec![record],
        }
    }
}
