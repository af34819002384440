#![doc = include_str!("../readme.md")]

pub mod channel;
pub mod consts;
pub mod enums;
pub mod error;
pub mod ffi;
pub mod header;
pub mod log;

pub use channel::{Channel, Direction, channel_is_tx, channel_rx, channel_tx};
pub use consts::{LIBBLADERF_API_VERSION, MACROS, MacroDef, MacroType};
pub use error::{Error, Result, StatusCode};
pub use header::{HeaderDefines, Report, verify, verify_file};
pub use log::LogLevel;
