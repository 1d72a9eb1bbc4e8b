use crate::prelude::*;

use crate::ecu::inverter::{InverterRecord, InverterTelemetry};
use crate::ecu::model::DispatchStrategy;
use crate::ecu::signal::SignalMap;
use crate::ecu::summary::CollectorSummary;

use serde::Serialize;

/// The three responses of one polling cycle, as handed over by whatever
/// talks to the ECU. Each buffer must be a complete frame including the
/// `END\n` trailer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawFrames {
    pub summary: Vec<u8>,
    pub inverters: Vec<u8>,
    pub signal: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecodedReading {
    pub summary: CollectorSummary,
    pub telemetry: InverterTelemetry,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder {
    dispatch: DispatchStrategy,
}

impl Decoder {
    pub fn new(dispatch: DispatchStrategy) -> Self {
        Self { dispatch }
    }

    pub fn dispatch(&self) -> DispatchStrategy {
        self.dispatch
    }

    /// Decodes a whole cycle. The summary has to decode before anything
    /// else since the signal frame is sized by its inverter count.
    pub fn decode(&self, frames: &RawFrames) -> DecodeResult<DecodedReading> {
        let summary = CollectorSummary::decode(&frames.summary)?;

        let signal = SignalMap::decode(frames.signal.as_deref(), summary.qty_of_inverters());

        let telemetry = InverterTelemetry::decode(&frames.inverters, &signal, &self.dispatch)?;

        if usize::from(summary.qty_of_inverters()) != telemetry.inverters.len() {
            // the two frames are taken seconds apart, so this is not fatal
            debug!(
                "summary reports {} inverters, telemetry has {}",
                summary.qty_of_inverters(),
                telemetry.inverters.len()
            );
        }

        Ok(DecodedReading { summary, telemetry })
    }
}

impl DecodedReading {
    pub fn record(&self) -> ReadingRecord<'_> {
        ReadingRecord {
            ecu_id: &self.summary.ecu_id,
            firmware: self.summary.firmware(),
            timezone: self.summary.timezone(),
            lifetime_energy: self.summary.lifetime_energy,
            current_power: self.summary.current_power,
            today_energy: self.summary.today_energy,
            qty_of_inverters: self.summary.qty_of_inverters(),
            qty_of_online_inverters: self.summary.qty_of_online_inverters(),
            timestamp: &self.telemetry.timestamp,
            total_power: self.telemetry.total_power(),
            inverters: &self.telemetry.inverters,
        }
    }
}

/// Flat view of a [`DecodedReading`] for publishing. Field names are stable.
#[derive(Debug, Serialize)]
pub struct ReadingRecord<'a> {
    pub ecu_id: &'a str,
    pub firmware: Option<&'a str>,
    pub timezone: Option<&'a str>,
    pub lifetime_energy: f64,
    pub current_power: u32,
    pub today_energy: f64,
    pub qty_of_inverters: u16,
    pub qty_of_online_inverters: u16,
    pub timestamp: &'a str,
    pub total_power: u32,
    pub inverters: &'a [InverterRecord],
}
