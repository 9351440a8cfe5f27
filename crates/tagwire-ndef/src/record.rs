use crate::{
    MAX_PAYLOAD_SIZE,
    error::{NdefError, Result, TnfViolation},
    header::NdefHeader,
    ndef_type::NdefType,
    parser::{self, ParseMode},
    payload::TextPayload,
    rtd,
    uri::{self, NdefUri},
};

/// A single NDEF record, validated on construction and immutable afterwards
///
/// An absent id is an empty `id`, never a separate state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NdefRecord {
    tnf: NdefType,
    type_: Vec<u8>,
    id: Vec<u8>,
    payload: Vec<u8>,
}

impl NdefRecord {
    pub fn new(tnf: NdefType, type_: Vec<u8>, id: Vec<u8>, payload: Vec<u8>) -> Result<Self> {
        check_tnf(tnf, &type_, &id, &payload)?;
        check_field_lengths(&type_, &id, &payload)?;

        Ok(Self {
            tnf,
            type_,
            id,
            payload,
        })
    }

    /// Same as [`NdefRecord::new`] but for a raw TNF value, as read from a foreign source
    pub fn from_raw_tnf(tnf: u8, type_: Vec<u8>, id: Vec<u8>, payload: Vec<u8>) -> Result<Self> {
        let tnf = NdefType::try_from(tnf)?;
        Self::new(tnf, type_, id, payload)
    }

    /// The `TNF_EMPTY` record, all fields empty
    pub fn empty() -> Self {
        Self {
            tnf: NdefType::Empty,
            type_: Vec::new(),
            id: Vec::new(),
            payload: Vec::new(),
        }
    }

    /// Parse exactly one record, ignoring the MB and ME flags
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let records = parser::parse_records(bytes, ParseMode::Standalone)?;
        parser::first_record(records)
    }

    pub fn tnf(&self) -> NdefType {
        self.tnf
    }

    pub fn type_(&self) -> &[u8] {
        &self.type_
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_parts(self) -> (NdefType, Vec<u8>, Vec<u8>, Vec<u8>) {
        (self.tnf, self.type_, self.id, self.payload)
    }

    /// Bytes this record takes once written
    pub fn encoded_len(&self) -> usize {
        let header = NdefHeader::for_record(self, false, false);
        header.encoded_len() + self.type_.len() + self.id.len() + self.payload.len()
    }

    pub fn is_well_known(&self, rtd: &[u8]) -> bool {
        self.tnf == NdefType::WellKnown && self.type_ == rtd
    }

    /// Interpret the record as a uri, `None` when it does not carry one
    pub fn uri(&self) -> Option<NdefUri> {
        uri::build_uri(self, false)
    }

    pub fn text_payload(&self) -> Option<TextPayload> {
        if !self.is_well_known(rtd::TEXT) {
            return None;
        }

        TextPayload::parse(&self.payload)
    }

    pub fn mime_type(&self) -> Option<&str> {
        if self.tnf != NdefType::Mime {
            return None;
        }

        std::str::from_utf8(&self.type_).ok()
    }

    /// Package name of an application launch record
    pub fn application_package(&self) -> Option<&str> {
        if self.tnf != NdefType::External || self.type_ != rtd::APPLICATION {
            return None;
        }

        std::str::from_utf8(&self.payload).ok()
    }
}

/// Check that the fields are allowed for the given TNF
///
/// Shared by the constructor and by the parser once a record is assembled.
pub fn check_tnf(tnf: NdefType, type_: &[u8], id: &[u8], payload: &[u8]) -> Result<(), TnfViolation> {
    match tnf {
        NdefType::Empty => {
            if !type_.is_empty() || !id.is_empty() || !payload.is_empty() {
                return Err(TnfViolation::EmptyWithData);
            }
        }
        NdefType::WellKnown | NdefType::Mime | NdefType::AbsoluteUri | NdefType::External => {}
        NdefType::Unknown | NdefType::Reserved => {
            if !type_.is_empty() {
                return Err(TnfViolation::TypeNotAllowed(tnf));
            }
        }
        NdefType::Unchanged => return Err(TnfViolation::Unchanged),
    }

    Ok(())
}

fn check_field_lengths(type_: &[u8], id: &[u8], payload: &[u8]) -> Result<()> {
    if type_.len() > u8::MAX as usize {
        return Err(TnfViolation::TypeTooLong(type_.len()).into());
    }

    if id.len() > u8::MAX as usize {
        return Err(TnfViolation::IdTooLong(id.len()).into());
    }

    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(NdefError::PayloadTooLarge {
            size: payload.len() as u64,
        });
    }

    Ok(())
}
