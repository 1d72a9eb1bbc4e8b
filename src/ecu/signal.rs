use crate::prelude::*;

use crate::ecu::command::{ResponseCode, RESPONSE_CODE_OFFSET, RESPONSE_CODE_WIDTH};
use crate::ecu::cursor::Cursor;
use crate::ecu::inverter::InverterId;
use crate::ecu::{body_len, envelope};

use std::collections::HashMap;
use std::convert::TryFrom;

const ENTRIES_OFFSET: usize = 15;
const ENTRY_WIDTH: usize = 7;

/// Signal quality (0-100%) per inverter, built from the optional signal
/// frame. Signal data is best effort: anything wrong with the frame gives
/// an empty map, never an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignalMap {
    entries: HashMap<InverterId, u8>,
}

impl SignalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(frame: Option<&[u8]>, qty_of_inverters: u16) -> Self {
        let frame = match frame {
            Some(frame) if !frame.is_empty() => frame,
            _ => {
                debug!("no signal data available");
                return Self::default();
            }
        };

        match Self::try_decode(frame, qty_of_inverters) {
            Ok(map) => map,
            Err(e) => {
                warn!("ignoring signal data: {}", e);
                Self::default()
            }
        }
    }

    fn try_decode(frame: &[u8], qty_of_inverters: u16) -> DecodeResult<Self> {
        let label = ResponseCode::Signal.label();
        let cursor = Cursor::new(frame, label);

        let code = cursor.read_ascii_digits(RESPONSE_CODE_OFFSET, RESPONSE_CODE_WIDTH)?;
        if ResponseCode::try_from(code as u16).ok() != Some(ResponseCode::Signal) {
            debug!("{}: frame has response code {:04}, not a signal response", label, code);
            return Ok(Self::default());
        }

        envelope::validate(frame, label)?;

        let mut map = Self::default();
        if qty_of_inverters == 0 {
            return Ok(map);
        }

        let cursor = cursor.window(body_len(frame));
        let mut offset = ENTRIES_OFFSET;
        for _ in 0..qty_of_inverters {
            let id = InverterId::new(cursor.slice(offset, 6)?);
            let strength = cursor.read_u8(offset + 6)?;
            map.insert(id, Utils::signal_percent(strength));
            offset += ENTRY_WIDTH;
        }

        debug!("{}: signal for {} inverters", label, map.len());

        Ok(map)
    }

    pub fn insert(&mut self, id: InverterId, percent: u8) {
        self.entries.insert(id, percent.min(100));
    }

    pub fn get(&self, id: &InverterId) -> Option<u8> {
        self.entries.get(id).copied()
    }

    /// Signal for `id`, 0 when the inverter was not reported.
    pub fn percent(&self, id: &InverterId) -> u8 {
        self.get(id).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
