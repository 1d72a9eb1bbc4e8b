use crate::prelude::*;

use crate::ecu::cursor::Cursor;

pub const START_MARKER: &str = "APS";
pub const END_MARKER: &str = "END";

const LENGTH_OFFSET: usize = 5;
const LENGTH_WIDTH: usize = 4;

/// Checks the `APS` prefix, the `END` marker in front of the terminating
/// byte, and the 4-digit length at offset 5, which must equal the frame
/// length minus the terminator.
pub fn validate(frame: &[u8], label: &str) -> DecodeResult<()> {
    let cursor = Cursor::new(frame, label);

    check_marker(&cursor, 0, START_MARKER)?;

    if frame.len() < 4 {
        return Err(bad_envelope(&cursor, frame.len().saturating_sub(1), END_MARKER));
    }
    check_marker(&cursor, frame.len() - 4, END_MARKER)?;

    let declared = cursor.read_ascii_digits(LENGTH_OFFSET, LENGTH_WIDTH)? as usize;
    let actual = frame.len() - 1;
    if declared != actual {
        return Err(DecodeError::ChecksumMismatch {
            label: label.to_string(),
            declared,
            actual,
            frame: cursor.frame_hex(),
        });
    }

    trace!("{}: envelope ok, {} bytes", label, frame.len());

    Ok(())
}

fn check_marker(cursor: &Cursor, offset: usize, marker: &'static str) -> DecodeResult<()> {
    match cursor.slice(offset, marker.len()) {
        Ok(found) if found == marker.as_bytes() => Ok(()),
        _ => Err(bad_envelope(cursor, offset, marker)),
    }
}

fn bad_envelope(cursor: &Cursor, offset: usize, expected: &'static str) -> DecodeError {
    let found = cursor
        .slice(offset, expected.len())
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default();

    DecodeError::BadEnvelope {
        label: cursor.label().to_string(),
        expected,
        found,
        offset,
        frame: cursor.frame_hex(),
    }
}
