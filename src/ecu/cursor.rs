use crate::prelude::*;

use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u32, u8 as be_u8};
use nom::IResult;

/// Bounds-checked, offset-addressed view over one frame.
///
/// The cursor holds no position of its own. Every read names its offset and
/// callers thread the next offset through explicitly, which is how the ECU
/// lays out its records (each one starts where the previous one ended).
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    frame: &'a [u8],
    data: &'a [u8],
    label: &'a str,
}

impl<'a> Cursor<'a> {
    pub fn new(frame: &'a [u8], label: &'a str) -> Self {
        Self {
            frame,
            data: frame,
            label,
        }
    }

    /// A cursor that can only read the first `len` bytes. Errors still
    /// report the whole frame.
    pub fn window(&self, len: usize) -> Self {
        Self {
            frame: self.frame,
            data: &self.data[..len.min(self.data.len())],
            label: self.label,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn label(&self) -> &'a str {
        self.label
    }

    pub fn frame_hex(&self) -> String {
        Utils::hex(self.frame)
    }

    pub fn fits(&self, offset: usize, width: usize) -> bool {
        offset
            .checked_add(width)
            .map_or(false, |end| end <= self.data.len())
    }

    pub fn slice(&self, offset: usize, width: usize) -> DecodeResult<&'a [u8]> {
        if !self.fits(offset, width) {
            return Err(self.out_of_bounds(offset, width));
        }
        Ok(&self.data[offset..offset + width])
    }

    fn run<T, F>(&self, offset: usize, width: usize, mut parser: F) -> DecodeResult<T>
    where
        F: FnMut(&'a [u8]) -> IResult<&'a [u8], T>,
    {
        let input = self.slice(offset, width)?;
        parser(input)
            .map(|(_, value)| value)
            .map_err(|_| self.out_of_bounds(offset, width))
    }

    pub fn read_u8(&self, offset: usize) -> DecodeResult<u8> {
        self.run(offset, 1, be_u8)
    }

    pub fn read_hex_u16(&self, offset: usize) -> DecodeResult<u16> {
        self.run(offset, 2, be_u16)
    }

    pub fn read_hex_u32(&self, offset: usize) -> DecodeResult<u32> {
        self.run(offset, 4, be_u32)
    }

    pub fn read_ascii(&self, offset: usize, len: usize) -> DecodeResult<String> {
        let bytes = self.run(offset, len, take(len))?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Reads a fixed-width ASCII decimal field, such as the envelope length
    /// or the 3-digit firmware/timezone length prefixes.
    pub fn read_ascii_digits(&self, offset: usize, len: usize) -> DecodeResult<u32> {
        let bytes = self.slice(offset, len)?;
        if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(self.malformed(offset, bytes));
        }
        // at most 9 digits fit a u32 without overflow
        std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(|| self.malformed(offset, bytes))
    }

    /// 6 raw bytes rendered as 12 lowercase hex characters.
    pub fn read_identifier(&self, offset: usize) -> DecodeResult<String> {
        Ok(Utils::hex(self.slice(offset, 6)?))
    }

    /// 7 raw bytes holding `YYYYMMDDHHMMSS` as hex digits, rendered as
    /// `YYYY-MM-DD HH:MM:SS`. The date is not checked.
    pub fn read_timestamp(&self, offset: usize) -> DecodeResult<String> {
        let t = Utils::hex(self.slice(offset, 7)?);
        Ok(format!(
            "{}-{}-{} {}:{}:{}",
            &t[0..4],
            &t[4..6],
            &t[6..8],
            &t[8..10],
            &t[10..12],
            &t[12..14]
        ))
    }

    /// Runs a fixed-width parser at `offset` and returns the value along with
    /// the offset just past it.
    pub fn parse_at<T, F>(&self, offset: usize, width: usize, parser: F) -> DecodeResult<(T, usize)>
    where
        F: FnMut(&'a [u8]) -> IResult<&'a [u8], T>,
    {
        let value = self.run(offset, width, parser)?;
        Ok((value, offset + width))
    }

    pub fn out_of_bounds(&self, offset: usize, width: usize) -> DecodeError {
        DecodeError::OutOfBounds {
            label: self.label.to_string(),
            offset,
            width,
            len: self.data.len(),
            frame: self.frame_hex(),
        }
    }

    pub fn malformed(&self, offset: usize, field: &[u8]) -> DecodeError {
        DecodeError::MalformedNumeric {
            label: self.label.to_string(),
            offset,
            field: Utils::hex(field),
            frame: self.frame_hex(),
        }
    }

    pub fn invalid_reading(&self, reason: String) -> DecodeError {
        DecodeError::InvalidReading {
            label: self.label.to_string(),
            reason,
            frame: self.frame_hex(),
        }
    }
}
