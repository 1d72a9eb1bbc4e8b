use crate::prelude::*;

use crate::ecu::command::ResponseCode;
use crate::ecu::cursor::Cursor;
use crate::ecu::{ascii_field, body_len, envelope};

use nom_derive::{Nom, Parse};
use serde::Serialize;

const HEADER_OFFSET: usize = 13;
const HEADER_WIDTH: usize = 26;

// {{{ SummaryHeader
// fixed part of every summary frame, offsets 13..39
#[derive(Debug, Nom)]
#[nom(BigEndian)]
struct SummaryHeader {
    #[nom(Parse = "ascii_field(12)")]
    ecu_id: String,
    #[nom(Parse = "ascii_field(2)")]
    sub_version: String,
    lifetime_energy: u32,
    current_power: u32,
    today_energy: u32,
}
// }}}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InverterCounts {
    pub total: u16,
    pub online: u16,
}

/// The two known summary layouts differ in where the inverter counts sit
/// and in whether a timezone follows the firmware string.
#[derive(Clone, Debug, PartialEq)]
pub enum SummaryLayout {
    V1 {
        counts: InverterCounts,
        firmware: String,
        timezone: String,
    },
    V2 {
        counts: InverterCounts,
        firmware: String,
    },
    Unrecognized {
        code: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollectorSummary {
    pub ecu_id: String,
    /// kWh
    pub lifetime_energy: f64,
    /// W
    pub current_power: u32,
    /// kWh
    pub today_energy: f64,
    pub layout: SummaryLayout,
}

impl CollectorSummary {
    pub fn decode(frame: &[u8]) -> DecodeResult<Self> {
        let label = ResponseCode::Summary.label();
        envelope::validate(frame, label)?;

        let cursor = Cursor::new(frame, label).window(body_len(frame));

        let (header, _) = cursor.parse_at(HEADER_OFFSET, HEADER_WIDTH, |i| {
            SummaryHeader::parse(i)
        })?;

        if header.lifetime_energy == 0 {
            return Err(cursor.invalid_reading(format!(
                "ECU {} returned 0 for lifetime energy",
                header.ecu_id
            )));
        }

        let layout = match header.sub_version.as_str() {
            "01" => Self::decode_v1(&cursor)?,
            "02" => Self::decode_v2(&cursor)?,
            code => {
                debug!("{}: unrecognized summary sub-version {:?}", label, code);
                SummaryLayout::Unrecognized {
                    code: code.to_string(),
                }
            }
        };

        let summary = Self {
            ecu_id: header.ecu_id,
            lifetime_energy: Utils::round(header.lifetime_energy as f64 / 10.0, 1),
            current_power: header.current_power,
            today_energy: Utils::round(header.today_energy as f64 / 100.0, 2),
            layout,
        };

        debug!(
            "{}: ecu_id={} lifetime={} today={} power={} inverters={}/{}",
            label,
            summary.ecu_id,
            summary.lifetime_energy,
            summary.today_energy,
            summary.current_power,
            summary.qty_of_online_inverters(),
            summary.qty_of_inverters()
        );

        Ok(summary)
    }

    fn decode_v1(cursor: &Cursor) -> DecodeResult<SummaryLayout> {
        let counts = InverterCounts {
            total: cursor.read_hex_u16(46)?,
            online: cursor.read_hex_u16(48)?,
        };

        let vsl = cursor.read_ascii_digits(52, 3)? as usize;
        let firmware = cursor.read_ascii(55, vsl)?;

        let tsl = cursor.read_ascii_digits(55 + vsl, 3)? as usize;
        let timezone = cursor.read_ascii(58 + vsl, tsl)?;

        Ok(SummaryLayout::V1 {
            counts,
            firmware,
            timezone,
        })
    }

    fn decode_v2(cursor: &Cursor) -> DecodeResult<SummaryLayout> {
        let counts = InverterCounts {
            total: cursor.read_hex_u16(39)?,
            online: cursor.read_hex_u16(41)?,
        };

        let vsl = cursor.read_ascii_digits(49, 3)? as usize;
        let firmware = cursor.read_ascii(52, vsl)?;

        Ok(SummaryLayout::V2 { counts, firmware })
    }

    pub fn counts(&self) -> InverterCounts {
        match &self.layout {
            SummaryLayout::V1 { counts, .. } | SummaryLayout::V2 { counts, .. } => *counts,
            SummaryLayout::Unrecognized { .. } => InverterCounts::default(),
        }
    }

    pub fn qty_of_inverters(&self) -> u16 {
        self.counts().total
    }

    pub fn qty_of_online_inverters(&self) -> u16 {
        self.counts().online
    }

    pub fn firmware(&self) -> Option<&str> {
        match &self.layout {
            SummaryLayout::V1 { firmware, .. } | SummaryLayout::V2 { firmware, .. } => {
                Some(firmware)
            }
            SummaryLayout::Unrecognized { .. } => None,
        }
    }

    pub fn timezone(&self) -> Option<&str> {
        match &self.layout {
            SummaryLayout::V1 { timezone, .. } => Some(timezone),
            _ => None,
        }
    }
}
