//! Constructors for the common well known and external records

use tracing::debug;

use crate::{
    error::{BuilderError, Result},
    ndef_type::NdefType,
    payload::TextPayload,
    record::NdefRecord,
    rtd, uri,
};

const FALLBACK_LANGUAGE: &str = "en";
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

impl NdefRecord {
    /// Well known text record, utf-8 encoded
    ///
    /// Without a language the process locale is used, see [`default_language`].
    pub fn new_text(language: Option<&str>, text: &str) -> Result<Self> {
        let language = match language {
            Some(language) if !language.is_empty() => language.to_string(),
            _ => default_language(),
        };

        if !language.is_ascii() {
            return Err(BuilderError::NonAsciiLanguageCode(language).into());
        }

        if language.len() > TextPayload::LANGUAGE_LENGTH_MASK as usize {
            return Err(BuilderError::LanguageCodeTooLong(language.len()).into());
        }

        let mut payload = Vec::with_capacity(1 + language.len() + text.len());
        payload.push(language.len() as u8 & TextPayload::LANGUAGE_LENGTH_MASK);
        payload.extend_from_slice(language.as_bytes());
        payload.extend_from_slice(text.as_bytes());

        Self::new(NdefType::WellKnown, rtd::TEXT.to_vec(), vec![], payload)
    }

    /// Well known uri record, the longest known prefix is abbreviated
    pub fn new_uri(uri: &str) -> Result<Self> {
        if uri.is_empty() {
            return Err(BuilderError::EmptyUri.into());
        }

        let uri = uri::NdefUri::new(uri);
        Self::new(
            NdefType::WellKnown,
            rtd::URI.to_vec(),
            vec![],
            uri::compress(uri.as_str()),
        )
    }

    pub fn new_mime(mime_type: &str, data: Vec<u8>) -> Result<Self> {
        let mime_type = normalize_mime_type(mime_type)?;
        Self::new(NdefType::Mime, mime_type.into_bytes(), vec![], data)
    }

    /// External type record, typed `domain:type`
    pub fn new_external(domain: &str, type_: &str, data: Vec<u8>) -> Result<Self> {
        let domain = domain.trim().to_lowercase();
        if domain.is_empty() {
            return Err(BuilderError::EmptyDomain.into());
        }

        let type_ = type_.trim().to_lowercase();
        if type_.is_empty() {
            return Err(BuilderError::EmptyExternalType.into());
        }

        let full_type = format!("{domain}:{type_}");
        Self::new(NdefType::External, full_type.into_bytes(), vec![], data)
    }

    /// Application launch record for `package`
    pub fn new_application(package: &str) -> Result<Self> {
        if package.is_empty() {
            return Err(BuilderError::EmptyPackageName.into());
        }

        Self::new(
            NdefType::External,
            rtd::APPLICATION.to_vec(),
            vec![],
            package.as_bytes().to_vec(),
        )
    }
}

/// Trim, lower-case and drop any `;` parameters
pub fn normalize_mime_type(mime_type: &str) -> Result<String, BuilderError> {
    let mut mime_type = mime_type.trim().to_lowercase();

    if let Some(params) = mime_type.find(';') {
        mime_type.truncate(params);
    }

    let mime_type = mime_type.trim().to_string();
    if mime_type.is_empty() {
        return Err(BuilderError::EmptyMimeType);
    }

    if !mime_type.is_ascii() {
        return Err(BuilderError::NonAsciiMimeType(mime_type));
    }

    let Some(slash) = mime_type.find('/') else {
        return Err(BuilderError::MissingMimeSeparator(mime_type));
    };

    if slash == 0 {
        return Err(BuilderError::MissingMajorType(mime_type));
    }

    if slash == mime_type.len() - 1 {
        return Err(BuilderError::MissingMinorType(mime_type));
    }

    Ok(mime_type)
}

/// Language of the process locale, `en` when none is set
pub fn default_language() -> String {
    language_from(|var| std::env::var(var).ok())
}

/// First non-empty locale variable as read by `lookup`, in `LOCALE_VARS` order
fn language_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    let locale = LOCALE_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .find(|value| !value.is_empty());

    let Some(locale) = locale else {
        debug!("no locale set, text records default to {FALLBACK_LANGUAGE}");
        return FALLBACK_LANGUAGE.to_string();
    };

    language_of_locale(&locale)
}

/// `en_US.UTF-8` -> `en`
fn language_of_locale(locale: &str) -> String {
    let language = locale
        .split(['_', '.', '@', '-'])
        .next()
        .unwrap_or_default();

    match language {
        "" | "C" | "POSIX" => FALLBACK_LANGUAGE.to_string(),
        language => language.to_lowercase(),
    }
}
