pub mod command;
pub mod cursor;
pub mod envelope;
pub mod inverter;
pub mod model;
pub mod signal;
pub mod summary;

use nom::bytes::complete::take;
use nom::combinator::map;
use nom::IResult;

/// Number of bytes in front of the `END\n` trailer. Field reads are bounded
/// to this so a bad offset can never run into the trailer.
pub fn body_len(frame: &[u8]) -> usize {
    frame.len().saturating_sub(4)
}

pub(crate) fn ascii_field<'a>(len: usize) -> impl Fn(&'a [u8]) -> IResult<&'a [u8], String> {
    move |i: &'a [u8]| map(take(len), |b: &[u8]| String::from_utf8_lossy(b).into_owned())(i)
}
