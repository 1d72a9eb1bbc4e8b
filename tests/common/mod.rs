#![allow(dead_code)]

use apsystems_ecu::prelude::*;

pub use apsystems_ecu::ecu::inverter::InverterId;
pub use apsystems_ecu::ecu::model::{ByIdentifierPrefix, ByInlineCode, DispatchStrategy};
pub use apsystems_ecu::ecu::signal::SignalMap;

pub fn common_setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// captured from a YC600 installation, 7 inverters, selector 01
pub const YC600_INVERTERS_HEX: &str = "415053313130313736303030323030303100072020112412051040800009401601303101f3006f001400e4001400e440800009562201303101f3006f001300e4001400e440800009182601303101f3006f001400e3001400e340800009293301303101f3006f001400e3001300e340800009191301303101f3006f001500e3001400e340800009243401303101f3006f001400e3001400e340800009184001303101f3006f001400e2001400e2454e440a";

// captured from a QS1 installation, 7 inverters, selector 03
pub const QS1_INVERTERS_HEX: &str = "415053313130313930303030323030303100072020122915125380200010441301303302570065000200f100010007000680200011026901303302570064000100f200010006000680200011054901303302570065000100f100010006000680200011131401303302570064000100f100000006000680200011234201303302570065000000ef00010005000680200011330401303302570065000400f000000000000080200011352301303302570066000100f1000100060006454e440a";

pub struct Factory;

impl Factory {
    /// Wraps `payload` (everything from offset 13 up to the trailer) in the
    /// APS envelope with a correct length field.
    pub fn frame(code: &str, payload: &[u8]) -> Vec<u8> {
        let mut frame = b"APS110000".to_vec();
        frame.extend_from_slice(code.as_bytes());
        frame.extend_from_slice(payload);
        frame.extend_from_slice(b"END\n");

        let len = format!("{:04}", frame.len() - 1);
        frame[5..9].copy_from_slice(len.as_bytes());
        frame
    }

    pub fn ecu_id() -> &'static str {
        "216000012345"
    }

    fn summary_fixed(sub_version: &str, lifetime: u32, power: u32, today: u32) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(Self::ecu_id().as_bytes());
        p.extend_from_slice(sub_version.as_bytes());
        p.extend_from_slice(&lifetime.to_be_bytes());
        p.extend_from_slice(&power.to_be_bytes());
        p.extend_from_slice(&today.to_be_bytes());
        p
    }

    /// ECU-R style summary: counts at 46/48, firmware and timezone
    pub fn summary_v1(
        lifetime: u32,
        power: u32,
        today: u32,
        counts: (u16, u16),
        firmware: &str,
        timezone: &str,
    ) -> Vec<u8> {
        let mut p = Self::summary_fixed("01", lifetime, power, today);
        p.extend_from_slice(&[0; 7]); // 39..46
        p.extend_from_slice(&counts.0.to_be_bytes());
        p.extend_from_slice(&counts.1.to_be_bytes());
        p.extend_from_slice(&[0; 2]); // 50..52
        p.extend_from_slice(format!("{:03}", firmware.len()).as_bytes());
        p.extend_from_slice(firmware.as_bytes());
        p.extend_from_slice(format!("{:03}", timezone.len()).as_bytes());
        p.extend_from_slice(timezone.as_bytes());
        p.extend_from_slice(&[0; 8]);
        Self::frame("0001", &p)
    }

    /// ECU-B style summary: counts at 39/41, firmware only
    pub fn summary_v2(
        lifetime: u32,
        power: u32,
        today: u32,
        counts: (u16, u16),
        firmware: &str,
    ) -> Vec<u8> {
        let mut p = Self::summary_fixed("02", lifetime, power, today);
        p.extend_from_slice(&counts.0.to_be_bytes());
        p.extend_from_slice(&counts.1.to_be_bytes());
        p.extend_from_slice(&[0; 6]); // 43..49
        p.extend_from_slice(format!("{:03}", firmware.len()).as_bytes());
        p.extend_from_slice(firmware.as_bytes());
        Self::frame("0001", &p)
    }

    pub fn summary_unknown_layout(lifetime: u32) -> Vec<u8> {
        let mut p = Self::summary_fixed("07", lifetime, 250, 1234);
        p.extend_from_slice(&[0; 4]);
        Self::frame("0001", &p)
    }

    /// 13-byte device header followed by `block` (raw u16 fields).
    pub fn device(uid: &str, online: bool, selector: &str, freq: u16, temp: i32, block: &[u16]) -> Vec<u8> {
        let mut d = hex::decode(uid).unwrap();
        d.push(online as u8);
        d.extend_from_slice(selector.as_bytes());
        d.extend_from_slice(&freq.to_be_bytes());
        d.extend_from_slice(&((temp + 100) as u16).to_be_bytes());
        for v in block {
            d.extend_from_slice(&v.to_be_bytes());
        }
        d
    }

    /// Inverter data frame declaring `declared` devices, holding `devices`.
    pub fn inverters(declared: u16, devices: &[Vec<u8>]) -> Vec<u8> {
        let mut p = b"0001".to_vec();
        p.extend_from_slice(&declared.to_be_bytes());
        p.extend_from_slice(&[0x20, 0x21, 0x06, 0x15, 0x13, 0x45, 0x07]);
        for d in devices {
            p.extend_from_slice(d);
        }
        Self::frame("0002", &p)
    }

    pub fn signal(entries: &[(&str, u8)]) -> Vec<u8> {
        let mut p = vec![0, 0];
        for (uid, strength) in entries {
            p.extend_from_slice(&hex::decode(uid).unwrap());
            p.push(*strength);
        }
        Self::frame("0030", &p)
    }

    pub fn yc600_inverters() -> Vec<u8> {
        Utils::from_hex(YC600_INVERTERS_HEX).unwrap()
    }

    pub fn qs1_inverters() -> Vec<u8> {
        Utils::from_hex(QS1_INVERTERS_HEX).unwrap()
    }

    pub fn inline() -> DispatchStrategy {
        ByInlineCode.into()
    }

    pub fn by_prefix() -> DispatchStrategy {
        ByIdentifierPrefix.into()
    }

    pub fn uid(s: &str) -> InverterId {
        s.parse().unwrap()
    }
}
