use num_enum::{IntoPrimitive, TryFromPrimitive};

pub const CMD_SUFFIX: &str = "END\n";

pub const ECU_QUERY: &str = "APS1100160001END\n";
pub const INVERTER_QUERY_PREFIX: &str = "APS1100280002";
pub const SIGNAL_QUERY_PREFIX: &str = "APS1100280030";

/// Offset and width of the 4-digit response code echoed back in every frame.
pub const RESPONSE_CODE_OFFSET: usize = 9;
pub const RESPONSE_CODE_WIDTH: usize = 4;

pub fn inverter_query(ecu_id: &str) -> String {
    format!("{}{}{}", INVERTER_QUERY_PREFIX, ecu_id, CMD_SUFFIX)
}

pub fn signal_query(ecu_id: &str) -> String {
    format!("{}{}{}", SIGNAL_QUERY_PREFIX, ecu_id, CMD_SUFFIX)
}

// {{{ ResponseCode
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum ResponseCode {
    Summary = 1,
    Inverters = 2,
    Signal = 30,
}
// }}}

impl ResponseCode {
    pub fn label(&self) -> &'static str {
        match self {
            ResponseCode::Summary => "ECU Query",
            ResponseCode::Inverters => "Inverter data",
            ResponseCode::Signal => "Signal Query",
        }
    }
}
