//! Free functions exported over uniffi, records cross the boundary as plain data

use crate::{
    error::{NdefError, Result},
    message::NdefMessage,
    ndef_type::NdefType,
    payload::TextPayload,
    record::NdefRecord,
};

/// Unvalidated record fields, checked again when converted back to a [`NdefRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct NdefRecordData {
    pub tnf: NdefType,
    pub record_type: Vec<u8>,
    pub id: Vec<u8>,
    pub payload: Vec<u8>,
}

impl TryFrom<NdefRecordData> for NdefRecord {
    type Error = NdefError;

    fn try_from(data: NdefRecordData) -> Result<Self> {
        NdefRecord::new(data.tnf, data.record_type, data.id, data.payload)
    }
}

impl From<NdefRecord> for NdefRecordData {
    fn from(record: NdefRecord) -> Self {
        let (tnf, record_type, id, payload) = record.into_parts();
        Self {
            tnf,
            record_type,
            id,
            payload,
        }
    }
}

fn to_message(records: Vec<NdefRecordData>) -> Result<NdefMessage> {
    let records = records
        .into_iter()
        .map(NdefRecord::try_from)
        .collect::<Result<Vec<_>>>()?;

    NdefMessage::try_new(records)
}

#[uniffi::export]
pub fn decode_ndef_message(bytes: Vec<u8>) -> Result<Vec<NdefRecordData>> {
    let message = NdefMessage::parse(&bytes)?;
    Ok(message.into_records().into_iter().map(Into::into).collect())
}

#[uniffi::export]
pub fn encode_ndef_message(records: Vec<NdefRecordData>) -> Result<Vec<u8>> {
    Ok(to_message(records)?.to_bytes())
}

#[uniffi::export]
pub fn ndef_message_encoded_length(records: Vec<NdefRecordData>) -> Result<u64> {
    Ok(to_message(records)?.encoded_len() as u64)
}

#[uniffi::export]
pub fn ndef_record_uri(record: NdefRecordData) -> Result<Option<String>> {
    let record = NdefRecord::try_from(record)?;
    Ok(record.uri().map(Into::into))
}

#[uniffi::export]
pub fn ndef_record_text(record: NdefRecordData) -> Result<Option<TextPayload>> {
    let record = NdefRecord::try_from(record)?;
    Ok(record.text_payload())
}

#[uniffi::export(default(language = None))]
pub fn build_text_record(language: Option<String>, text: String) -> Result<NdefRecordData> {
    NdefRecord::new_text(language.as_deref(), &text).map(Into::into)
}

#[uniffi::export]
pub fn build_uri_record(uri: String) -> Result<NdefRecordData> {
    NdefRecord::new_uri(&uri).map(Into::into)
}

#[uniffi::export]
pub fn build_mime_record(mime_type: String, data: Vec<u8>) -> Result<NdefRecordData> {
    NdefRecord::new_mime(&mime_type, data).map(Into::into)
}

#[uniffi::export]
pub fn build_external_record(
    domain: String,
    external_type: String,
    data: Vec<u8>,
) -> Result<NdefRecordData> {
    NdefRecord::new_external(&domain, &external_type, data).map(Into::into)
}

#[uniffi::export]
pub fn build_application_record(package: String) -> Result<NdefRecordData> {
    NdefRecord::new_application(&package).map(Into::into)
}
