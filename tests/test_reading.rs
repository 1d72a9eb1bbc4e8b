mod common;
use common::*;
use apsystems_ecu::ecu::command;
use apsystems_ecu::prelude::*;
use apsystems_ecu::reading::{Decoder, RawFrames};

fn frames() -> RawFrames {
    RawFrames {
        summary: Factory::summary_v2(16300, 143, 250, (7, 7), "ECU_B_1.2.22"),
        inverters: Factory::yc600_inverters(),
        signal: Some(Factory::signal(&[
            ("408000094016", 255),
            ("408000095622", 204),
            ("408000091826", 153),
            ("408000092933", 102),
            ("408000091913", 51),
            ("408000092434", 0),
            ("408000091840", 255),
        ])),
    }
}

#[test]
fn decodes_full_cycle() -> Result<()> {
    common_setup();

    let reading = Decoder::default().decode(&frames())?;

    assert_eq!(reading.summary.ecu_id, Factory::ecu_id());
    assert_eq!(reading.summary.lifetime_energy, 1630.0);
    assert_eq!(reading.telemetry.inverters.len(), 7);

    let signals: Vec<u8> = reading.telemetry.inverters.iter().map(|i| i.signal).collect();
    assert_eq!(signals, vec![100, 80, 60, 40, 20, 0, 100]);

    Ok(())
}

#[test]
fn missing_signal_frame_is_not_fatal() -> Result<()> {
    let mut frames = frames();
    frames.signal = None;

    let reading = Decoder::default().decode(&frames)?;

    assert!(reading.telemetry.inverters.iter().all(|i| i.signal == 0));

    Ok(())
}

#[test]
fn corrupt_signal_frame_is_not_fatal() -> Result<()> {
    let mut frames = frames();
    if let Some(signal) = frames.signal.as_mut() {
        signal.truncate(20);
    }

    let reading = Decoder::default().decode(&frames)?;

    assert!(reading.telemetry.inverters.iter().all(|i| i.signal == 0));

    Ok(())
}

#[test]
fn summary_failure_stops_the_cycle() {
    let mut frames = frames();
    frames.summary = Factory::summary_v2(0, 143, 250, (7, 7), "ECU_B_1.2.22");

    let err = Decoder::default().decode(&frames).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::InvalidReading);
    assert_eq!(err.label(), "ECU Query");
}

#[test]
fn telemetry_failure_stops_the_cycle() {
    let mut frames = frames();
    frames.inverters.pop();

    let err = Decoder::default().decode(&frames).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::BadEnvelope);
    assert_eq!(err.label(), "Inverter data");
}

#[test]
fn count_difference_between_frames_is_tolerated() -> Result<()> {
    let mut frames = frames();
    frames.summary = Factory::summary_v2(16300, 143, 250, (8, 7), "ECU_B_1.2.22");

    let reading = Decoder::default().decode(&frames)?;

    assert_eq!(reading.summary.qty_of_inverters(), 8);
    assert_eq!(reading.telemetry.inverters.len(), 7);

    Ok(())
}

#[test]
fn decoder_uses_configured_dispatch() -> Result<()> {
    let decoder = Decoder::new(Factory::by_prefix());
    assert_eq!(decoder.dispatch(), Factory::by_prefix());

    let reading = decoder.decode(&frames())?;
    assert_eq!(reading.telemetry.inverters[0].model.name(), "YC600");

    Ok(())
}

#[test]
fn record_field_names() -> Result<()> {
    let reading = Decoder::default().decode(&frames())?;
    let json = serde_json::to_value(reading.record())?;

    assert_eq!(json["ecu_id"], "216000012345");
    assert_eq!(json["firmware"], "ECU_B_1.2.22");
    assert!(json["timezone"].is_null());
    assert_eq!(json["lifetime_energy"], 1630.0);
    assert_eq!(json["current_power"], 143);
    assert_eq!(json["today_energy"], 2.5);
    assert_eq!(json["qty_of_inverters"], 7);
    assert_eq!(json["qty_of_online_inverters"], 7);
    assert_eq!(json["timestamp"], "2020-11-24 12:05:10");
    assert_eq!(json["total_power"], 279);
    assert_eq!(json["inverters"].as_array().map(Vec::len), Some(7));
    assert_eq!(json["inverters"][0]["model"], "YC600/DS3-D-L");
    assert_eq!(json["inverters"][0]["frequency"], 49.9);

    Ok(())
}

#[test]
fn query_strings() {
    assert_eq!(command::ECU_QUERY, "APS1100160001END\n");
    assert_eq!(
        command::inverter_query(Factory::ecu_id()),
        "APS1100280002216000012345END\n"
    );
    assert_eq!(
        command::signal_query(Factory::ecu_id()),
        "APS1100280030216000012345END\n"
    );
}
