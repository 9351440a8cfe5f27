//! Record type definitions registered with the NFC Forum, plus the
//! application launch marker used by this platform

/// Smart poster, payload is a nested NDEF message
pub const SMART_POSTER: &[u8] = b"Sp";

pub const TEXT: &[u8] = b"T";

pub const URI: &[u8] = b"U";

/// External type marking an application launch record, payload is the package name
pub const APPLICATION: &[u8] = b"ohos.com:pkg";

/// Namespace used when an external record is turned into a uri
pub const EXTERNAL_URI_PREFIX: &str = "vnd.ohos.nfc://ext/";
