use tracing::debug;

use crate::{message::NdefMessage, ndef_type::NdefType, record::NdefRecord, rtd};

/// URI prefix codes as defined in NFC Forum RTD URI specification
pub const URI_PREFIXES: &[&str] = &[
    "",                           // 0x00 - no prepending
    "http://www.",                // 0x01
    "https://www.",               // 0x02
    "http://",                    // 0x03
    "https://",                   // 0x04
    "tel:",                       // 0x05
    "mailto:",                    // 0x06
    "ftp://anonymous:anonymous@", // 0x07
    "ftp://ftp.",                 // 0x08
    "ftps://",                    // 0x09
    "sftp://",                    // 0x0A
    "smb://",                     // 0x0B
    "nfs://",                     // 0x0C
    "ftp://",                     // 0x0D
    "dav://",                     // 0x0E
    "news:",                      // 0x0F
    "telnet://",                  // 0x10
    "imap:",                      // 0x11
    "rtsp://",                    // 0x12
    "urn:",                       // 0x13
    "pop:",                       // 0x14
    "sip:",                       // 0x15
    "sips:",                      // 0x16
    "tftp:",                      // 0x17
    "btspp://",                   // 0x18
    "btl2cap://",                 // 0x19
    "btgoep://",                  // 0x1A
    "tcpobex://",                 // 0x1B
    "irdaobex://",                // 0x1C
    "file://",                    // 0x1D
    "urn:epc:id:",                // 0x1E
    "urn:epc:tag:",               // 0x1F
    "urn:epc:pat:",               // 0x20
    "urn:epc:raw:",               // 0x21
    "urn:epc:",                   // 0x22
    "urn:nfc:",                   // 0x23
];

/// A uri with its scheme lower-cased, the rest is kept as written
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::Deref, derive_more::Into)]
pub struct NdefUri(String);

impl NdefUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(normalize_scheme(uri.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn scheme(&self) -> Option<&str> {
        scheme_end(&self.0).map(|end| &self.0[..end])
    }
}

/// Uri carried by `record`, if any
///
/// Smart posters are searched one level deep, an external record inside a
/// smart poster does not count as its uri.
pub fn build_uri(record: &NdefRecord, in_smart_poster: bool) -> Option<NdefUri> {
    match record.tnf() {
        NdefType::WellKnown if record.type_() == rtd::SMART_POSTER && !in_smart_poster => {
            smart_poster_uri(record.payload())
        }
        NdefType::WellKnown if record.type_() == rtd::URI => expand(record.payload()),
        NdefType::AbsoluteUri => Some(NdefUri::new(String::from_utf8_lossy(record.type_()))),
        NdefType::External if !in_smart_poster => {
            let type_ = record
                .type_()
                .iter()
                .map(|&byte| {
                    if byte.is_ascii() {
                        byte as char
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect::<String>();

            Some(NdefUri::new(format!("{}{type_}", rtd::EXTERNAL_URI_PREFIX)))
        }
        _ => None,
    }
}

/// Expand a uri record payload, byte 0 is the prefix code and the rest is the suffix
pub fn expand(payload: &[u8]) -> Option<NdefUri> {
    // need at least the prefix code and one byte of suffix
    if payload.len() < 2 {
        return None;
    }

    let prefix = URI_PREFIXES.get(payload[0] as usize)?;
    let suffix = String::from_utf8_lossy(&payload[1..]);

    Some(NdefUri::new(format!("{prefix}{suffix}")))
}

/// Compress a uri into a uri record payload using the longest matching prefix
pub fn compress(uri: &str) -> Vec<u8> {
    let (code, prefix) = URI_PREFIXES
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, prefix)| uri.starts_with(*prefix))
        .max_by_key(|(_, prefix)| prefix.len())
        .map(|(code, prefix)| (code as u8, *prefix))
        .unwrap_or((0, ""));

    let suffix = &uri[prefix.len()..];
    let mut payload = Vec::with_capacity(1 + suffix.len());
    payload.push(code);
    payload.extend_from_slice(suffix.as_bytes());

    payload
}

fn smart_poster_uri(payload: &[u8]) -> Option<NdefUri> {
    let message = match NdefMessage::parse(payload) {
        Ok(message) => message,
        Err(error) => {
            debug!("smart poster payload is not an ndef message: {error}");
            return None;
        }
    };

    message.records().iter().find_map(|record| build_uri(record, true))
}

fn normalize_scheme(mut uri: String) -> String {
    if let Some(end) = scheme_end(&uri) {
        uri[..end].make_ascii_lowercase();
    }

    uri
}

/// Index of the ':' ending the scheme, a scheme can't contain '/', '?' or '#'
fn scheme_end(uri: &str) -> Option<usize> {
    let end = uri.find([':', '/', '?', '#'])?;
    (end > 0 && uri.as_bytes()[end] == b':').then_some(end)
}
