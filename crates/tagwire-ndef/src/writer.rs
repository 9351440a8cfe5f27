use crate::{header::NdefHeader, message::NdefMessage, record::NdefRecord};

/// Serialize a message, MB on the first record and ME on the last
///
/// Records are never chunked on output.
pub fn write_message(message: &NdefMessage) -> Vec<u8> {
    let records = message.records();
    let mut out = Vec::with_capacity(message.encoded_len());

    for (index, record) in records.iter().enumerate() {
        let message_begin = index == 0;
        let message_end = index == records.len() - 1;
        write_record(record, message_begin, message_end, &mut out);
    }

    debug_assert_eq!(out.len(), message.encoded_len());
    out
}

pub fn write_record(record: &NdefRecord, message_begin: bool, message_end: bool, out: &mut Vec<u8>) {
    let header = NdefHeader::for_record(record, message_begin, message_end);

    out.push(header.flag_byte());
    out.push(header.type_length);

    if header.flags.short_record() {
        out.push(header.payload_length as u8);
    } else {
        out.extend_from_slice(&header.payload_length.to_be_bytes());
    }

    if let Some(id_length) = header.id_length {
        out.push(id_length);
    }

    out.extend_from_slice(record.type_());
    out.extend_from_slice(record.id());
    out.extend_from_slice(record.payload());
}
