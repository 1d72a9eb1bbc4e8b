use crate::prelude::*;

use crate::ecu::cursor::Cursor;
use crate::ecu::inverter::DeviceHeader;

use enum_dispatch::*;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Hardware families the ECU reports. Each one fixes the width and field
/// order of the channel block that follows the common device header.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum InverterModel {
    #[serde(rename = "YC600/DS3-D-L")]
    Yc600Ds3L,
    #[serde(rename = "YC600")]
    Yc600,
    #[serde(rename = "YC1000")]
    Yc1000,
    #[serde(rename = "QS1")]
    Qs1,
    #[serde(rename = "DS3")]
    Ds3,
}

impl InverterModel {
    pub fn name(&self) -> &'static str {
        use InverterModel::*;

        match self {
            Yc600Ds3L => "YC600/DS3-D-L",
            Yc600 => "YC600",
            Yc1000 => "YC1000",
            Qs1 => "QS1",
            Ds3 => "DS3",
        }
    }

    pub fn channel_qty(&self) -> u8 {
        use InverterModel::*;

        match self {
            Yc600Ds3L | Yc600 | Ds3 => 2,
            Yc1000 | Qs1 => 4,
        }
    }

    /// Bytes consumed by the channel block.
    pub fn block_width(&self) -> usize {
        use InverterModel::*;

        match self {
            Yc600Ds3L | Yc600 => 8,
            Yc1000 => 14,
            Qs1 => 10,
            Ds3 => 12,
        }
    }

    /// Decodes the channel block at `offset` and returns it together with
    /// the offset of the next device header.
    pub fn decode_channels(
        &self,
        cursor: &Cursor,
        offset: usize,
    ) -> DecodeResult<(ChannelData, usize)> {
        use InverterModel::*;

        // whole block must be present before any field is read
        cursor.slice(offset, self.block_width())?;

        match self {
            Yc600Ds3L | Yc600 => decode_two_channel(cursor, offset),
            Yc1000 => decode_yc1000(cursor, offset),
            Qs1 => decode_qs1(cursor, offset),
            Ds3 => decode_ds3(cursor, offset),
        }
    }
}

impl std::fmt::Display for InverterModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChannelData {
    pub power: Vec<u16>,
    pub voltage: Vec<u16>,
    pub current: Vec<u16>,
}

// p v p v
fn decode_two_channel(cursor: &Cursor, offset: usize) -> DecodeResult<(ChannelData, usize)> {
    let mut data = ChannelData::default();
    let mut location = offset;

    for _ in 0..2 {
        data.power.push(cursor.read_hex_u16(location)?);
        data.voltage.push(cursor.read_hex_u16(location + 2)?);
        location += 4;
    }

    Ok((data, location))
}

// p v p v p v p
//
// four power readings but only three voltages; the fourth channel's voltage
// is not sent
fn decode_yc1000(cursor: &Cursor, offset: usize) -> DecodeResult<(ChannelData, usize)> {
    let mut data = ChannelData::default();
    let mut location = offset;

    for _ in 0..3 {
        data.power.push(cursor.read_hex_u16(location)?);
        data.voltage.push(cursor.read_hex_u16(location + 2)?);
        location += 4;
    }
    data.power.push(cursor.read_hex_u16(location)?);
    location += 2;

    Ok((data, location))
}

// p v p p p
fn decode_qs1(cursor: &Cursor, offset: usize) -> DecodeResult<(ChannelData, usize)> {
    let mut data = ChannelData::default();

    data.power.push(cursor.read_hex_u16(offset)?);
    data.voltage.push(cursor.read_hex_u16(offset + 2)?);
    let mut location = offset + 4;
    for _ in 0..3 {
        data.power.push(cursor.read_hex_u16(location)?);
        location += 2;
    }

    Ok((data, location))
}

// p v i p v i
fn decode_ds3(cursor: &Cursor, offset: usize) -> DecodeResult<(ChannelData, usize)> {
    let mut data = ChannelData::default();
    let mut location = offset;

    for _ in 0..2 {
        data.power.push(cursor.read_hex_u16(location)?);
        data.voltage.push(cursor.read_hex_u16(location + 2)?);
        data.current.push(cursor.read_hex_u16(location + 4)?);
        location += 6;
    }

    Ok((data, location))
}

// {{{ SelectorCode
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SelectorCode {
    TwoChannel = 1,
    Yc1000 = 2,
    Qs1 = 3,
    TwoChannelAlt = 4, // same block as 01, layout not confirmed on hardware
}
// }}}

#[enum_dispatch]
pub trait ModelDispatch {
    /// Picks the model for a device, or returns the offending dispatch key.
    fn select(&self, header: &DeviceHeader) -> Result<InverterModel, String>;
}

/// Keys off the 2-digit ASCII selector inside the device header.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ByInlineCode;

impl ModelDispatch for ByInlineCode {
    fn select(&self, header: &DeviceHeader) -> Result<InverterModel, String> {
        let code = header.selector_str();

        let selector = Some(code.as_str())
            .filter(|c| c.len() == 2 && c.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|c| c.parse::<u8>().ok())
            .and_then(|c| SelectorCode::try_from(c).ok())
            .ok_or_else(|| code.clone())?;

        Ok(match selector {
            SelectorCode::TwoChannel | SelectorCode::TwoChannelAlt => InverterModel::Yc600Ds3L,
            SelectorCode::Yc1000 => InverterModel::Yc1000,
            SelectorCode::Qs1 => InverterModel::Qs1,
        })
    }
}

/// Keys off the first 4 hex digits of the inverter UID.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ByIdentifierPrefix;

impl ModelDispatch for ByIdentifierPrefix {
    fn select(&self, header: &DeviceHeader) -> Result<InverterModel, String> {
        let prefix = header.id.prefix();

        match prefix.as_str() {
            "4080" => Ok(InverterModel::Yc600),
            "8020" => Ok(InverterModel::Qs1),
            "7020" | "7070" => Ok(InverterModel::Ds3),
            _ => Err(prefix),
        }
    }
}

/// Two ECU firmware families pick the channel layout differently and
/// neither is self-describing, so the strategy is chosen per deployment.
#[enum_dispatch(ModelDispatch)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DispatchStrategy {
    ByInlineCode(ByInlineCode),
    ByIdentifierPrefix(ByIdentifierPrefix),
}

impl Default for DispatchStrategy {
    fn default() -> Self {
        DispatchStrategy::ByInlineCode(ByInlineCode)
    }
}

/// Config-file spelling of [`DispatchStrategy`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    #[default]
    InlineCode,
    IdentifierPrefix,
}

impl From<DispatchKind> for DispatchStrategy {
    fn from(kind: DispatchKind) -> Self {
        match kind {
            DispatchKind::InlineCode => ByInlineCode.into(),
            DispatchKind::IdentifierPrefix => ByIdentifierPrefix.into(),
        }
    }
}
