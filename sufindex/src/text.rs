use crate::alphabet::Alphabet;
use crate::error::{IndexError, Result};

/// Half-open range `[start, end)` into a [`Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An immutable byte text terminated by exactly one sentinel.
///
/// The sentinel is the last byte, occurs nowhere else and is strictly smaller
/// than every other byte of the text. Every constructor checks this, so the
/// builders downstream never see a malformed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    bytes: Box<[u8]>,
}

impl Text {
    /// Wraps bytes that already end with `sentinel`.
    pub fn new(bytes: impl Into<Vec<u8>>, sentinel: u8) -> Result<Self> {
        let bytes = bytes.into();
        validate(&bytes, sentinel)?;
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Appends `sentinel` to `body`.
    pub fn with_sentinel(body: &[u8], sentinel: u8) -> Result<Self> {
        let mut bytes = Vec::with_capacity(body.len() + 1);
        bytes.extend_from_slice(body);
        bytes.push(sentinel);
        Self::new(bytes, sentinel)
    }

    /// Appends the alphabet's sentinel to `body`, rejecting undeclared symbols.
    pub fn with_alphabet(body: &[u8], alphabet: &Alphabet) -> Result<Self> {
        if let Some(pos) = body.iter().position(|&b| alphabet.rank(b).is_none()) {
            return Err(IndexError::invalid(format!(
                "symbol '{}' at position {} is not part of the declared alphabet",
                body[pos].escape_ascii(),
                pos
            )));
        }
        Self::with_sentinel(body, alphabet.sentinel())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The text without its trailing sentinel.
    pub fn body(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    // A validated text holds at least the sentinel.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn sentinel(&self) -> u8 {
        self.bytes[self.bytes.len() - 1]
    }

    pub fn suffix(&self, pos: usize) -> &[u8] {
        &self.bytes[pos..]
    }

    pub fn span(&self, span: Span) -> &[u8] {
        &self.bytes[span.start..span.end]
    }
}

impl AsRef<[u8]> for Text {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

fn validate(bytes: &[u8], sentinel: u8) -> Result<()> {
    let Some((&last, body)) = bytes.split_last() else {
        return Err(IndexError::invalid("text is empty"));
    };

    if last != sentinel {
        return Err(IndexError::invalid(format!(
            "text ends with '{}' instead of the sentinel '{}'",
            last.escape_ascii(),
            sentinel.escape_ascii()
        )));
    }

    for (pos, &b) in body.iter().enumerate() {
        if b == sentinel {
            return Err(IndexError::invalid(format!(
                "sentinel '{}' occurs again at position {}",
                sentinel.escape_ascii(),
                pos
            )));
        }
        if b < sentinel {
            return Err(IndexError::invalid(format!(
                "symbol '{}' at position {} sorts below the sentinel '{}'",
                b.escape_ascii(),
                pos,
                sentinel.escape_ascii()
            )));
        }
    }

    Ok(())
}
