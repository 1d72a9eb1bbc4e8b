use crate::prelude::*;

use crate::ecu::command::ResponseCode;
use crate::ecu::cursor::Cursor;
use crate::ecu::model::{DispatchStrategy, InverterModel, ModelDispatch};
use crate::ecu::signal::SignalMap;
use crate::ecu::{body_len, envelope};

use chrono::NaiveDateTime;
use nom::bytes::complete::take;
use nom::combinator::map;
use nom::IResult;
use nom_derive::{Nom, Parse};
use serde::{Serialize, Serializer};

const QTY_OFFSET: usize = 17;
const TIMESTAMP_OFFSET: usize = 19;
const INVERTER_BYTE_START: usize = 26;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// {{{ InverterId
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InverterId([u8; 6]);

impl InverterId {
    pub fn new(bytes: &[u8]) -> Self {
        let mut result = [0u8; 6];
        let len = std::cmp::min(bytes.len(), 6);
        result[..len].copy_from_slice(&bytes[..len]);
        Self(result)
    }

    pub fn data(&self) -> [u8; 6] {
        self.0
    }

    /// First 4 hex digits; identifies the hardware family on firmware that
    /// does not send a selector code.
    pub fn prefix(&self) -> String {
        Utils::hex(&self.0[..2])
    }

    fn parse_raw(i: &[u8]) -> IResult<&[u8], Self> {
        map(take(6usize), Self::new)(i)
    }
}

impl From<[u8; 6]> for InverterId {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for InverterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Utils::hex(&self.0))
    }
}

impl Serialize for InverterId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl std::str::FromStr for InverterId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| anyhow!("invalid inverter uid {:?}: {}", s, e))?;
        let bytes: [u8; 6] = bytes
            .try_into()
            .map_err(|_| anyhow!("inverter uid {:?} must be 12 hex digits", s))?;
        Ok(Self(bytes))
    }
}
// }}}

// {{{ DeviceHeader
/// The 13 bytes in front of every device's channel block.
#[derive(Clone, Debug, PartialEq, Eq, Nom)]
#[nom(BigEndian)]
pub struct DeviceHeader {
    #[nom(Parse = "InverterId::parse_raw")]
    pub id: InverterId,
    pub online: u8,
    #[nom(Parse = "selector_code")]
    pub selector: [u8; 2],
    pub frequency: u16,   // Hz * 10
    pub temperature: u16, // degrees C + 100
}

fn selector_code(i: &[u8]) -> IResult<&[u8], [u8; 2]> {
    map(take(2usize), |b: &[u8]| [b[0], b[1]])(i)
}

impl DeviceHeader {
    pub const WIDTH: usize = 13;

    pub fn is_online(&self) -> bool {
        self.online != 0
    }

    pub fn selector_str(&self) -> String {
        String::from_utf8_lossy(&self.selector).into_owned()
    }

    pub fn frequency_hz(&self) -> f64 {
        Utils::round(self.frequency as f64 / 10.0, 1)
    }

    pub fn temperature_c(&self) -> i32 {
        i32::from(self.temperature) - 100
    }
}
// }}}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InverterRecord {
    pub uid: InverterId,
    pub online: bool,
    pub signal: u8,
    pub frequency: f64,
    pub temperature: i32,
    pub model: InverterModel,
    pub channel_qty: u8,
    pub power: Vec<u16>,
    pub voltage: Vec<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub current: Vec<u16>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InverterTelemetry {
    /// `YYYY-MM-DD HH:MM:SS` as sent; not validated
    pub timestamp: String,
    pub inverter_qty: u16,
    /// wire order
    pub inverters: Vec<InverterRecord>,
}

impl InverterTelemetry {
    pub fn decode(
        frame: &[u8],
        signal: &SignalMap,
        dispatch: &DispatchStrategy,
    ) -> DecodeResult<Self> {
        let label = ResponseCode::Inverters.label();
        envelope::validate(frame, label)?;

        let cursor = Cursor::new(frame, label).window(body_len(frame));

        let inverter_qty = cursor.read_hex_u16(QTY_OFFSET)?;
        let timestamp = cursor.read_timestamp(TIMESTAMP_OFFSET)?;

        debug!("{}: {} inverters at {}", label, inverter_qty, timestamp);

        let mut inverters = Vec::with_capacity(inverter_qty as usize);
        let mut offset = INVERTER_BYTE_START;
        for _ in 0..inverter_qty {
            if !cursor.fits(offset, DeviceHeader::WIDTH) {
                debug!("{}: no room for another device header at offset {}", label, offset);
                break;
            }

            let (record, next) = Self::decode_device(&cursor, offset, signal, dispatch)?;
            inverters.push(record);
            offset = next;
        }

        if inverters.len() != inverter_qty as usize {
            return Err(DecodeError::DeviceCountMismatch {
                label: label.to_string(),
                declared: inverter_qty as usize,
                decoded: inverters.len(),
                frame: cursor.frame_hex(),
            });
        }

        Ok(Self {
            timestamp,
            inverter_qty,
            inverters,
        })
    }

    fn decode_device(
        cursor: &Cursor,
        offset: usize,
        signal: &SignalMap,
        dispatch: &DispatchStrategy,
    ) -> DecodeResult<(InverterRecord, usize)> {
        let (header, block) =
            cursor.parse_at(offset, DeviceHeader::WIDTH, |i| DeviceHeader::parse(i))?;

        let model = dispatch.select(&header).map_err(|code| {
            DecodeError::UnsupportedInverterModel {
                label: cursor.label().to_string(),
                code,
                offset,
                frame: cursor.frame_hex(),
            }
        })?;

        let (channels, next) = model.decode_channels(cursor, block)?;

        trace!(
            "{}: {} {} at offset {}, next device at {}",
            cursor.label(),
            header.id,
            model,
            offset,
            next
        );

        let record = InverterRecord {
            uid: header.id,
            online: header.is_online(),
            signal: signal.percent(&header.id),
            frequency: header.frequency_hz(),
            temperature: header.temperature_c(),
            model,
            channel_qty: model.channel_qty(),
            power: channels.power,
            voltage: channels.voltage,
            current: channels.current,
        };

        Ok((record, next))
    }

    pub fn get(&self, uid: &InverterId) -> Option<&InverterRecord> {
        self.inverters.iter().find(|i| &i.uid == uid)
    }

    /// `None` when the collector sent an impossible date.
    pub fn timestamp_parsed(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }

    /// Sum of every DC power reading, W.
    pub fn total_power(&self) -> u32 {
        self.inverters
            .iter()
            .flat_map(|i| i.power.iter())
            .map(|p| u32::from(*p))
            .sum()
    }
}
