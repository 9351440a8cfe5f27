use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tagwire_ndef::{
    FlagViolation, MAX_PAYLOAD_SIZE, NdefError, NdefMessage, NdefRecord, NdefType, parse,
    serialize,
};

fn arb_record() -> impl Strategy<Value = NdefRecord> {
    let typed = (
        prop_oneof![
            Just(NdefType::WellKnown),
            Just(NdefType::Mime),
            Just(NdefType::AbsoluteUri),
            Just(NdefType::External),
        ],
        prop::collection::vec(any::<u8>(), 0..16),
    );

    let untyped = prop_oneof![Just(NdefType::Unknown), Just(NdefType::Reserved)]
        .prop_map(|tnf| (tnf, Vec::new()));

    let with_data = (
        prop_oneof![typed, untyped],
        prop::collection::vec(any::<u8>(), 0..8),
        prop::collection::vec(any::<u8>(), 0..600),
    )
        .prop_map(|((tnf, type_), id, payload)| NdefRecord::new(tnf, type_, id, payload).unwrap());

    prop_oneof![1 => Just(NdefRecord::empty()), 6 => with_data]
}

fn arb_message() -> impl Strategy<Value = NdefMessage> {
    prop::collection::vec(arb_record(), 1..6)
        .prop_map(|records| NdefMessage::try_new(records).unwrap())
}

/// Split one record into chunk frames, `fragments` gives the payload cut points
fn chunked_frames(tnf: NdefType, type_: &[u8], payload: &[u8], fragments: &[usize]) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut start = 0;

    for (index, end) in fragments
        .iter()
        .copied()
        .chain(std::iter::once(payload.len()))
        .enumerate()
    {
        let first = index == 0;
        let last = end == payload.len();
        let fragment = &payload[start..end];
        start = end;

        let mut flags = if first { 0x80 | tnf.as_u8() } else { 0x06 };
        if last {
            flags |= 0x40;
        } else {
            flags |= 0x20;
        }

        bytes.push(flags);
        bytes.push(if first { type_.len() as u8 } else { 0 });
        bytes.extend_from_slice(&(fragment.len() as u32).to_be_bytes());
        if first {
            bytes.extend_from_slice(type_);
        }
        bytes.extend_from_slice(fragment);
    }

    bytes
}

proptest! {
    #[test]
    fn prop_parse_serialize_round_trip(message in arb_message()) {
        let bytes = serialize(&message);
        let parsed = parse(&bytes).unwrap();
        prop_assert_eq!(parsed, message);
    }

    #[test]
    fn prop_encoded_len_matches_output(message in arb_message()) {
        prop_assert_eq!(message.encoded_len(), serialize(&message).len());
    }

    #[test]
    fn prop_trailing_bytes_rejected(message in arb_message(), extra in prop::collection::vec(any::<u8>(), 1..4)) {
        let mut bytes = serialize(&message);
        let end = bytes.len();
        bytes.extend_from_slice(&extra);

        let is_trailing_data = matches!(
            parse(&bytes),
            Err(NdefError::TrailingData { offset, remaining }) if offset == end as u64 && remaining == extra.len() as u64
        );
        prop_assert!(is_trailing_data);
    }

    #[test]
    fn prop_chunked_equals_unchunked(
        payload in prop::collection::vec(any::<u8>(), 2..300),
        cuts in prop::collection::btree_set(1usize..300, 1..4),
    ) {
        let cuts = cuts.into_iter().filter(|cut| *cut < payload.len()).collect::<Vec<_>>();
        prop_assume!(!cuts.is_empty());

        let record = NdefRecord::new(NdefType::Mime, b"a/b".to_vec(), vec![], payload.clone()).unwrap();
        let unchunked = parse(&serialize(&NdefMessage::from(record))).unwrap();

        let chunked = parse(&chunked_frames(NdefType::Mime, b"a/b", &payload, &cuts)).unwrap();
        prop_assert_eq!(chunked, unchunked);
    }

    #[test]
    fn prop_mime_normalization_is_idempotent(
        major in "[a-z]{1,8}",
        minor in "[a-z0-9+.-]{1,8}",
        pad in " {0,3}",
        upper in any::<bool>(),
    ) {
        let plain = format!("{major}/{minor}");
        let mut messy = format!("{pad}{plain}{pad}; charset=utf-8");
        if upper {
            messy = messy.to_uppercase();
        }

        let a = NdefRecord::new_mime(&plain, vec![1, 2]).unwrap();
        let b = NdefRecord::new_mime(&messy, vec![1, 2]).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_parse_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = parse(&bytes);
    }
}

#[test]
fn first_record_without_message_begin() {
    let error = parse(&hex::decode("5101015500").unwrap()).unwrap_err();
    assert_eq!(
        error,
        NdefError::InvalidFlagSequence {
            record: 0,
            reason: FlagViolation::MissingMessageBegin,
        }
    );
}

#[test]
fn uri_record_from_wire() {
    let bytes = hex::decode("d1010c5503").unwrap();
    let mut bytes = bytes;
    bytes.extend_from_slice(b"example.com");

    let message = parse(&bytes).unwrap();
    let uri = message.records()[0].uri().unwrap();
    assert_eq!(uri.as_str(), "http://example.com");
}

#[test]
fn text_builder_payload() {
    let record = NdefRecord::new_text(Some("en"), "hi").unwrap();
    assert_eq!(record.payload(), &[0x02, b'e', b'n', b'h', b'i']);
}

#[test]
fn payload_size_boundary() {
    let exact = NdefRecord::new(NdefType::Unknown, vec![], vec![], vec![0; MAX_PAYLOAD_SIZE]).unwrap();
    let bytes = serialize(&NdefMessage::from(exact.clone()));
    let parsed = parse(&bytes).unwrap();
    assert_eq!(parsed.records()[0].payload().len(), MAX_PAYLOAD_SIZE);

    // same frame, one more payload byte
    let mut bytes = bytes;
    bytes[2..6].copy_from_slice(&(MAX_PAYLOAD_SIZE as u32 + 1).to_be_bytes());
    bytes.push(0);
    assert_eq!(
        parse(&bytes).unwrap_err(),
        NdefError::PayloadTooLarge {
            size: MAX_PAYLOAD_SIZE as u64 + 1
        }
    );
}

#[test]
fn empty_tnf_rules() {
    assert!(NdefRecord::new(NdefType::Empty, vec![], vec![], vec![]).is_ok());
    assert!(matches!(
        NdefRecord::new(NdefType::Empty, vec![1], vec![], vec![]),
        Err(NdefError::InvalidTnfForFields(_))
    ));
}

#[test]
fn standalone_record_parse() {
    let record = NdefRecord::new_uri("https://example.com").unwrap();
    let bytes = serialize(&NdefMessage::from(record.clone()));

    // flags do not matter out of a message
    let mut bytes = bytes;
    bytes[0] &= !0xC0;
    assert_eq!(NdefRecord::parse(&bytes).unwrap(), record);
}
