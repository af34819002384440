//! Error handling for bladerf-shim
//!
//! The exported C surface never fails. Errors only exist on the Rust side:
//! decoding raw vendor values into typed enums, mapping libbladeRF status
//! codes, and checking a vendor header against the pinned macro table.

use std::io;

use thiserror::Error;

/// A specialized Result type for bladerf-shim operations
pub type Result<T> = std::result::Result<T, Error>;

/// Status codes returned by libbladeRF functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StatusCode {
    /// Operation successful.
    Success = 0,
    Unexpected = -1,
    Range = -2,
    Inval = -3,
    Mem = -4,
    Io = -5,
    Timeout = -6,
    Nodev = -7,
    Unsupported = -8,
    Misaligned = -9,
    Checksum = -10,
    NoFile = -11,
    UpdateFpga = -12,
    UpdateFw = -13,
    TimePast = -14,
    QueueFull = -15,
    FpgaOp = -16,
    Permission = -17,
    WouldBlock = -18,
    NotInit = -19,
}

impl StatusCode {
    /// Get the C identifier for the status code.
    pub fn name(self) -> &'static str {
        match self {
            StatusCode::Success => "0",
            StatusCode::Unexpected => "BLADERF_ERR_UNEXPECTED",
            StatusCode::Range => "BLADERF_ERR_RANGE",
            StatusCode::Inval => "BLADERF_ERR_INVAL",
            StatusCode::Mem => "BLADERF_ERR_MEM",
            StatusCode::Io => "BLADERF_ERR_IO",
            StatusCode::Timeout => "BLADERF_ERR_TIMEOUT",
            StatusCode::Nodev => "BLADERF_ERR_NODEV",
            StatusCode::Unsupported => "BLADERF_ERR_UNSUPPORTED",
            StatusCode::Misaligned => "BLADERF_ERR_MISALIGNED",
            StatusCode::Checksum => "BLADERF_ERR_CHECKSUM",
            StatusCode::NoFile => "BLADERF_ERR_NO_FILE",
            StatusCode::UpdateFpga => "BLADERF_ERR_UPDATE_FPGA",
            StatusCode::UpdateFw => "BLADERF_ERR_UPDATE_FW",
            StatusCode::TimePast => "BLADERF_ERR_TIME_PAST",
            StatusCode::QueueFull => "BLADERF_ERR_QUEUE_FULL",
            StatusCode::FpgaOp => "BLADERF_ERR_FPGA_OP",
            StatusCode::Permission => "BLADERF_ERR_PERMISSION",
            StatusCode::WouldBlock => "BLADERF_ERR_WOULD_BLOCK",
            StatusCode::NotInit => "BLADERF_ERR_NOT_INIT",
        }
    }

    /// Human-readable description, as printed by `bladerf_strerror()`.
    pub fn description(self) -> &'static str {
        match self {
            StatusCode::Success => "Success",
            StatusCode::Unexpected => "An unexpected failure occurred",
            StatusCode::Range => "Provided parameter is out of range",
            StatusCode::Inval => "Invalid operation/parameter",
            StatusCode::Mem => "Memory allocation error",
            StatusCode::Io => "File/Device I/O error",
            StatusCode::Timeout => "Operation timed out",
            StatusCode::Nodev => "No device(s) available",
            StatusCode::Unsupported => "Operation not supported",
            StatusCode::Misaligned => "Misaligned flash access",
            StatusCode::Checksum => "Invalid checksum",
            StatusCode::NoFile => "File not found",
            StatusCode::UpdateFpga => "An FPGA update is required",
            StatusCode::UpdateFw => "A firmware update is required",
            StatusCode::TimePast => "Requested timestamp is in the past",
            StatusCode::QueueFull => "Could not enqueue data into full queue",
            StatusCode::FpgaOp => "An FPGA operation reported failure",
            StatusCode::Permission => "Insufficient permissions for the requested operation",
            StatusCode::WouldBlock => {
                "Operation would block, but has been requested to be non-blocking"
            }
            StatusCode::NotInit => "Device insufficiently initialized for operation",
        }
    }
}

impl TryFrom<i32> for StatusCode {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        let status = match code {
            0 => StatusCode::Success,
            -1 => StatusCode::Unexpected,
            -2 => StatusCode::Range,
            -3 => StatusCode::Inval,
            -4 => StatusCode::Mem,
            -5 => StatusCode::Io,
            -6 => StatusCode::Timeout,
            -7 => StatusCode::Nodev,
            -8 => StatusCode::Unsupported,
            -9 => StatusCode::Misaligned,
            -10 => StatusCode::Checksum,
            -11 => StatusCode::NoFile,
            -12 => StatusCode::UpdateFpga,
            -13 => StatusCode::UpdateFw,
            -14 => StatusCode::TimePast,
            -15 => StatusCode::QueueFull,
            -16 => StatusCode::FpgaOp,
            -17 => StatusCode::Permission,
            -18 => StatusCode::WouldBlock,
            -19 => StatusCode::NotInit,
            other => return Err(Error::UnknownStatus(other)),
        };
        Ok(status)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.name())
    }
}

/// Turn a libbladeRF return code into a `Result`.
///
/// Zero and positive values are success; libbladeRF uses positive returns
/// for counts and booleans.
pub fn check(code: i32) -> Result<()> {
    if code >= 0 {
        return Ok(());
    }
    Err(Error::Status(StatusCode::try_from(code)?))
}

/// Errors that can occur in bladerf-shim operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (reading a vendor header)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A libbladeRF call reported failure
    #[error("libbladeRF error: {0}")]
    Status(StatusCode),

    /// A negative return code outside the documented set
    #[error("Unknown libbladeRF status code: {0}")]
    UnknownStatus(i32),

    /// Raw value does not correspond to any variant of a vendor enum
    #[error("Invalid {kind} value: {value}")]
    UnknownValue { kind: &'static str, value: i64 },

    /// Malformed preprocessor line in a vendor header
    #[error("Header parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A define exists but its body is not a constant expression we understand
    #[error("Cannot evaluate {name}: {message}")]
    Eval { name: String, message: String },

    /// A pinned macro is absent from the vendor header
    #[error("Macro {0} not defined in header")]
    MissingMacro(String),

    /// The vendor header disagrees with the pinned table
    #[error("Macro {name} drifted: pinned {expected:#x}, header has {found:#x}")]
    Drift {
        name: String,
        expected: u64,
        found: u64,
    },
}

impl Error {
    /// Create an evaluation error for the named define
    pub fn eval<N: Into<String>, S: Into<String>>(name: N, msg: S) -> Self {
        Error::Eval {
            name: name.into(),
            message: msg.into(),
        }
    }

    /// Create a parse error for a header line (1-based)
    pub fn parse<S: Into<String>>(line: usize, msg: S) -> Self {
        Error::Parse {
            line,
            message: msg.into(),
        }
    }
}
