use crate::error::TnfViolation;

/// Type name format, the low 3 bits of a record's flag byte
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display, uniffi::Enum)]
pub enum NdefType {
    #[display("TNF_EMPTY")]
    Empty,

    #[display("TNF_WELL_KNOWN")]
    WellKnown,

    #[display("TNF_MIME_MEDIA")]
    Mime,

    #[display("TNF_ABSOLUTE_URI")]
    AbsoluteUri,

    #[display("TNF_EXTERNAL_TYPE")]
    External,

    #[display("TNF_UNKNOWN")]
    Unknown,

    /// Only valid on chunk continuations, never on an assembled record
    #[display("TNF_UNCHANGED")]
    Unchanged,

    #[display("TNF_RESERVED")]
    Reserved,
}

impl NdefType {
    pub const MASK: u8 = 0x07;

    /// Decode the low 3 bits of a flag byte, higher bits are ignored
    pub fn from_flag_byte(byte: u8) -> Self {
        match byte & Self::MASK {
            0 => Self::Empty,
            1 => Self::WellKnown,
            2 => Self::Mime,
            3 => Self::AbsoluteUri,
            4 => Self::External,
            5 => Self::Unknown,
            6 => Self::Unchanged,
            _ => Self::Reserved,
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::WellKnown => 1,
            Self::Mime => 2,
            Self::AbsoluteUri => 3,
            Self::External => 4,
            Self::Unknown => 5,
            Self::Unchanged => 6,
            Self::Reserved => 7,
        }
    }
}

impl TryFrom<u8> for NdefType {
    type Error = TnfViolation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MASK {
            return Err(TnfViolation::OutOfRange(value));
        }

        Ok(Self::from_flag_byte(value))
    }
}

impl From<NdefType> for u8 {
    fn from(tnf: NdefType) -> Self {
        tnf.as_u8()
    }
}
