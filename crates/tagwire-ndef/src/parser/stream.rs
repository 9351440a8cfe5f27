use winnow::{
    Bytes, Parser, Partial,
    error::{ContextError, ErrMode, Needed},
    stream::Stream as _,
};

use crate::error::{Field, NdefError, Result};

pub type Stream<'i> = Partial<&'i Bytes>;
pub fn new(b: &[u8]) -> Stream<'_> {
    Partial::new(Bytes::new(b))
}

/// Partial byte stream that remembers where it started, so failures can
/// report the absolute offset of the field being read
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'i> {
    stream: Stream<'i>,
    total: usize,
}

impl<'i> Cursor<'i> {
    pub fn new(bytes: &'i [u8]) -> Self {
        Self {
            stream: new(bytes),
            total: bytes.len(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.stream.eof_offset()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes consumed so far
    pub fn offset(&self) -> usize {
        self.total - self.remaining()
    }

    /// Run `parser` for `field`, running out of input becomes [`NdefError::TruncatedInput`]
    pub fn read<O, P>(&mut self, field: Field, mut parser: P) -> Result<O>
    where
        P: Parser<Stream<'i>, O, ErrMode<ContextError>>,
    {
        let offset = self.offset();

        parser.parse_next(&mut self.stream).map_err(|error| {
            let needed = match error {
                ErrMode::Incomplete(Needed::Size(size)) => Some(size.get() as u64),
                _ => None,
            };

            NdefError::TruncatedInput {
                offset: offset as u64,
                field,
                needed,
            }
        })
    }
}
