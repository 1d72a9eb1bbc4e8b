pub use anyhow::{anyhow, bail, Context, Result};
pub use log::{debug, error, info, trace, warn};

pub use crate::config::Config;
pub use crate::error::{DecodeError, DecodeErrorKind, DecodeResult};
pub use crate::options::Options;
pub use crate::utils::Utils;
pub use crate::{file_error, file_error_with_source};
