// SPDX-License-Identifier: MIT

use core::fmt;

/// Result type for container operations.
pub type CfbResult<T = ()> = core::result::Result<T, CfbError>;

/// Error type for container operations.
#[derive(Debug, Clone)]
pub enum CfbError {
    /// Caller error: image too short, offset past the sector end, sector
    /// word not a regular sector, or an operation on a cleared reader.
    InvalidArgument(&'static str),

    /// The 512-byte header violates a format invariant.
    HeaderInvalid(&'static str),

    /// A resolved byte range lies outside the image.
    OutOfBounds,

    /// A sector chain terminated before delivering the promised bytes.
    CorruptChain(&'static str),

    /// The directory tree revisits an entry or references one that cannot
    /// exist in this image.
    CorruptDirectory(&'static str),
}

impl CfbError {
    pub fn msg(&self) -> &'static str {
        match self {
            CfbError::InvalidArgument(msg) => msg,
            CfbError::HeaderInvalid(msg) => msg,
            CfbError::OutOfBounds => "Out of bounds",
            CfbError::CorruptChain(msg) => msg,
            CfbError::CorruptDirectory(msg) => msg,
        }
    }
}

impl fmt::Display for CfbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CfbError::InvalidArgument(_) => write!(f, "invalid argument: {}", self.msg()),
            CfbError::HeaderInvalid(_) => write!(f, "invalid header: {}", self.msg()),
            CfbError::OutOfBounds => write!(f, "{}", self.msg()),
            CfbError::CorruptChain(_) => write!(f, "corrupt sector chain: {}", self.msg()),
            CfbError::CorruptDirectory(_) => write!(f, "corrupt directory: {}", self.msg()),
        }
    }
}
