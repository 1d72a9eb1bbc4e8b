pub struct Utils;

impl Utils {
    pub fn round(value: f64, precision: u32) -> f64 {
        let factor = 10f64.powi(precision as i32);
        (value * factor).round() / factor
    }

    pub fn hex(data: &[u8]) -> String {
        hex::encode(data)
    }

    /// Parse a captured frame written as hex text. Whitespace (including
    /// line breaks from copy/paste) is ignored.
    pub fn from_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        hex::decode(compact)
    }

    // raw strength byte is 0..=255
    pub fn signal_percent(raw: u8) -> u8 {
        ((raw as f64 / 255.0) * 100.0).round() as u8
    }
}
