//! Compact binary form of selectors.
//!
//! Lets a host ship a pre-parsed selector array to another thread or process
//! without re-tokenizing. All integers are little-endian, strings are a
//! `u32` byte length followed by UTF-8.
//!
//! ```text
//! list     := count:u32 selector*
//! selector := match:u8 relation:u8 pseudo:u8 flags:u8 value:str extra
//! extra    := 0
//!           | 1 name:str case:u8
//!           | 2 a:i32 b:i32
//!           | 3 argument:str
//!           | 4 list
//! ```

use std::io::{self, Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use thiserror::Error;

use super::list::SelectorList;
use super::{
    AttributeMatchType, CSSSelector, MatchType, PseudoType, RelationType, SelectorData,
    SelectorFlags,
};

/// Nested selector lists deeper than this are rejected.
const MAX_NESTING: usize = 32;

/// The fewest bytes any encoded selector can occupy (header, empty value,
/// `extra` tag).
const MIN_SELECTOR_BYTES: usize = 4 + 4 + 1;

const EXTRA_NONE: u8 = 0;
const EXTRA_ATTRIBUTE: u8 = 1;
const EXTRA_NTH: u8 = 2;
const EXTRA_ARGUMENT: u8 = 3;
const EXTRA_LIST: u8 = 4;

/// Why a byte buffer could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input ended in the middle of a value.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A length prefix points past the end of the input.
    #[error("length {length} exceeds the {remaining} bytes remaining")]
    LengthOutOfRange {
        /// The declared length.
        length: u32,
        /// Bytes actually left.
        remaining: usize,
    },
    /// A string payload is not UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    /// An enum discriminant is out of range.
    #[error("unknown {field} tag {value}")]
    UnknownTag {
        /// Which field carried the tag.
        field: &'static str,
        /// The offending byte.
        value: u8,
    },
    /// Nested selector lists exceed the supported depth.
    #[error("selector lists nested more than {MAX_NESTING} deep")]
    NestingTooDeep,
    /// The position flags do not describe a well-formed list.
    #[error("selector list is not terminated")]
    MalformedList,
    /// Any other I/O failure from the underlying reader.
    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for DecodeError {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof
        } else {
            Self::Io(error)
        }
    }
}

impl SelectorList {
    /// Write the list in the binary form.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn encode_into<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_list(self.as_slice(), writer)
    }

    /// The binary form as a byte vector.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        if let Err(error) = self.encode_into(&mut bytes) {
            log::debug!("failed to encode selector list: {error}");
        }
        bytes
    }

    /// Rebuild a list from its binary form. Trailing bytes are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] for truncated or malformed input.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::new(bytes);
        read_list(&mut cursor, 0)
    }

    /// Like [`decode`](Self::decode), but yields the empty (invalid) list on
    /// failure.
    #[must_use]
    pub fn decode_or_empty(bytes: &[u8]) -> Self {
        Self::decode(bytes).unwrap_or_else(|error| {
            log::debug!("discarding undecodable selector list: {error}");
            Self::empty()
        })
    }
}

/// Write one selector.
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn encode_selector<W: Write>(selector: &CSSSelector, writer: &mut W) -> io::Result<()> {
    writer.write_u8(selector.match_type() as u8)?;
    writer.write_u8(selector.relation() as u8)?;
    writer.write_u8(selector.pseudo_type() as u8)?;
    writer.write_u8(selector.flags().bits())?;
    write_str(selector.value(), writer)?;
    match selector.data() {
        SelectorData::None => writer.write_u8(EXTRA_NONE),
        SelectorData::Attribute { name, case } => {
            writer.write_u8(EXTRA_ATTRIBUTE)?;
            write_str(name, writer)?;
            writer.write_u8(*case as u8)
        }
        SelectorData::Nth { a, b } => {
            writer.write_u8(EXTRA_NTH)?;
            writer.write_i32::<LittleEndian>(*a)?;
            writer.write_i32::<LittleEndian>(*b)
        }
        SelectorData::Argument(argument) => {
            writer.write_u8(EXTRA_ARGUMENT)?;
            write_str(argument, writer)
        }
        SelectorData::List(list) => {
            writer.write_u8(EXTRA_LIST)?;
            write_list(list.as_slice(), writer)
        }
    }
}

/// Read one selector written by [`encode_selector`].
///
/// # Errors
///
/// Returns a [`DecodeError`] for truncated or malformed input.
pub fn decode_selector(cursor: &mut Cursor<&[u8]>) -> Result<CSSSelector, DecodeError> {
    read_selector(cursor, 0)
}

fn write_list<W: Write>(selectors: &[CSSSelector], writer: &mut W) -> io::Result<()> {
    let count = u32::try_from(selectors.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "selector list too long"))?;
    writer.write_u32::<LittleEndian>(count)?;
    for selector in selectors {
        encode_selector(selector, writer)?;
    }
    Ok(())
}

fn write_str<W: Write>(value: &str, writer: &mut W) -> io::Result<()> {
    let length = u32::try_from(value.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string too long"))?;
    writer.write_u32::<LittleEndian>(length)?;
    writer.write_all(value.as_bytes())
}

fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    let consumed = usize::try_from(cursor.position()).unwrap_or(usize::MAX);
    cursor.get_ref().len().saturating_sub(consumed)
}

fn read_list(cursor: &mut Cursor<&[u8]>, depth: usize) -> Result<SelectorList, DecodeError> {
    if depth > MAX_NESTING {
        return Err(DecodeError::NestingTooDeep);
    }
    let count = cursor.read_u32::<LittleEndian>()?;
    let left = remaining(cursor);
    let needed = usize::try_from(count)
        .unwrap_or(usize::MAX)
        .saturating_mul(MIN_SELECTOR_BYTES);
    if needed > left {
        return Err(DecodeError::LengthOutOfRange {
            length: count,
            remaining: left,
        });
    }

    let mut selectors = Vec::new();
    for _ in 0..count {
        selectors.push(read_selector(cursor, depth)?);
    }

    // Walking a list relies on its final selector closing the last compound,
    // complex selector and list, and on no earlier selector closing the list.
    if let Some((last, rest)) = selectors.split_last()
        && (!last.flags().contains(SelectorFlags::POSITION)
            || rest.iter().any(CSSSelector::is_last_in_selector_list))
    {
        return Err(DecodeError::MalformedList);
    }
    Ok(SelectorList::from(selectors.into_boxed_slice()))
}

fn read_selector(cursor: &mut Cursor<&[u8]>, depth: usize) -> Result<CSSSelector, DecodeError> {
    let match_type = read_tag(cursor, "match", MatchType::from_repr)?;
    let relation = read_tag(cursor, "relation", RelationType::from_repr)?;
    let pseudo_type = read_tag(cursor, "pseudo", PseudoType::from_repr)?;
    let flags_byte = cursor.read_u8()?;
    let flags = SelectorFlags::from_bits(flags_byte).ok_or(DecodeError::UnknownTag {
        field: "flags",
        value: flags_byte,
    })?;
    let value = read_string(cursor)?;

    let data = match cursor.read_u8()? {
        EXTRA_NONE => SelectorData::None,
        EXTRA_ATTRIBUTE => {
            let name = read_string(cursor)?;
            let case = read_tag(cursor, "case", AttributeMatchType::from_repr)?;
            SelectorData::Attribute { name, case }
        }
        EXTRA_NTH => {
            let a = cursor.read_i32::<LittleEndian>()?;
            let b = cursor.read_i32::<LittleEndian>()?;
            SelectorData::Nth { a, b }
        }
        EXTRA_ARGUMENT => SelectorData::Argument(read_string(cursor)?),
        EXTRA_LIST => SelectorData::List(read_list(cursor, depth + 1)?),
        other => {
            return Err(DecodeError::UnknownTag {
                field: "extra",
                value: other,
            });
        }
    };

    Ok(CSSSelector::from_parts(
        match_type,
        relation,
        pseudo_type,
        flags,
        value,
        data,
    ))
}

fn read_tag<T>(
    cursor: &mut Cursor<&[u8]>,
    field: &'static str,
    from_repr: fn(u8) -> Option<T>,
) -> Result<T, DecodeError> {
    let value = cursor.read_u8()?;
    from_repr(value).ok_or(DecodeError::UnknownTag { field, value })
}

fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String, DecodeError> {
    let length = cursor.read_u32::<LittleEndian>()?;
    let left = remaining(cursor);
    let size = usize::try_from(length).unwrap_or(usize::MAX);
    if size > left {
        return Err(DecodeError::LengthOutOfRange {
            length,
            remaining: left,
        });
    }
    let mut bytes = vec![0; size];
    cursor.read_exact(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}
