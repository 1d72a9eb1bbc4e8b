use thiserror::Error;

/// Creates an anyhow error with the current file and line number
#[macro_export]
macro_rules! file_error {
    ($($arg:tt)*) => {
        anyhow::anyhow!(
            "[{}:{}] {}",
            std::path::Path::new(file!()).file_name().unwrap_or_default().to_string_lossy(),
            line!(),
            format!($($arg)*)
        )
    };
}

/// Creates an anyhow error with the current file and line number, and includes a source error
#[macro_export]
macro_rules! file_error_with_source {
    ($source:expr, $($arg:tt)*) => {
        anyhow::anyhow!(
            "[{}:{}] {}: {}",
            std::path::Path::new(file!()).file_name().unwrap_or_default().to_string_lossy(),
            line!(),
            format!($($arg)*),
            $source
        )
    };
}

/// Failure to decode one ECU frame.
///
/// Every variant carries the frame label (which query the frame answered)
/// and the whole frame as hex, so a failure can be replayed from the log
/// line alone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{label}: bad envelope, expected {expected:?} at offset {offset}, found {found:?} data={frame}")]
    BadEnvelope {
        label: String,
        expected: &'static str,
        found: String,
        offset: usize,
        frame: String,
    },

    #[error("{label}: checksum failed checksum={declared} datalen={actual} data={frame}")]
    ChecksumMismatch {
        label: String,
        declared: usize,
        actual: usize,
        frame: String,
    },

    #[error("{label}: malformed numeric field at offset {offset} field={field} data={frame}")]
    MalformedNumeric {
        label: String,
        offset: usize,
        field: String,
        frame: String,
    },

    #[error("{label}: read of {width} bytes at offset {offset} exceeds frame length {len} data={frame}")]
    OutOfBounds {
        label: String,
        offset: usize,
        width: usize,
        len: usize,
        frame: String,
    },

    #[error("{label}: invalid reading, {reason} data={frame}")]
    InvalidReading {
        label: String,
        reason: String,
        frame: String,
    },

    #[error("{label}: unsupported inverter model {code:?} at offset {offset} data={frame}")]
    UnsupportedInverterModel {
        label: String,
        code: String,
        offset: usize,
        frame: String,
    },

    #[error("{label}: declared {declared} inverters but decoded {decoded} data={frame}")]
    DeviceCountMismatch {
        label: String,
        declared: usize,
        decoded: usize,
        frame: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeErrorKind {
    BadEnvelope,
    ChecksumMismatch,
    MalformedNumeric,
    OutOfBounds,
    InvalidReading,
    UnsupportedInverterModel,
    DeviceCountMismatch,
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        use DecodeError::*;

        match self {
            BadEnvelope { .. } => DecodeErrorKind::BadEnvelope,
            ChecksumMismatch { .. } => DecodeErrorKind::ChecksumMismatch,
            MalformedNumeric { .. } => DecodeErrorKind::MalformedNumeric,
            OutOfBounds { .. } => DecodeErrorKind::OutOfBounds,
            InvalidReading { .. } => DecodeErrorKind::InvalidReading,
            UnsupportedInverterModel { .. } => DecodeErrorKind::UnsupportedInverterModel,
            DeviceCountMismatch { .. } => DecodeErrorKind::DeviceCountMismatch,
        }
    }

    pub fn label(&self) -> &str {
        use DecodeError::*;

        match self {
            BadEnvelope { label, .. }
            | ChecksumMismatch { label, .. }
            | MalformedNumeric { label, .. }
            | OutOfBounds { label, .. }
            | InvalidReading { label, .. }
            | UnsupportedInverterModel { label, .. }
            | DeviceCountMismatch { label, .. } => label,
        }
    }
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
