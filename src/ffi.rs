//! C ABI surface.
//!
//! Mirrors the header below. Every constant is an immutable `static` with an
//! unmangled name, so a caller links against it exactly as it would against
//! a C global. None of these symbols can fail or change at runtime.
//!
//! ```c
//! #include <stdint.h>
//!
//! extern const uint64_t ReTuneNow;
//! extern const uint32_t MetaFlagTxBurstStart;
//! extern const uint32_t MetaFlagTxBurstEnd;
//! extern const uint32_t MetaFlagTxNow;
//! extern const uint32_t MetaFlagTxUpdateTimestamp;
//! extern const uint32_t MetaFlagRxNow;
//! extern const uint32_t MetaFlagRxHwUnderflow;
//! extern const uint32_t MetaFlagRxHwMiniexp1;
//! extern const uint32_t MetaFlagRxHwMiniexp2;
//! extern const uint32_t MetaStatusOverrun;
//! extern const uint32_t MetaStatusUnderrun;
//! extern const uint8_t TriggerRegArm;
//! extern const uint8_t TriggerRegFire;
//! extern const uint8_t TriggerRegMaster;
//! extern const uint8_t TriggerRegLine;
//! extern void *const StreamNoData;
//! extern void *const StreamShutdown;
//! extern const int ChannelInvalid;
//! extern const int ModuleInvalid;
//! extern const int ModuleRx;
//! extern const int ModuleTx;
//!
//! int ChannelRx(const int ch);
//! int ChannelTx(const int ch);
//! int ChannelIsTx(const int ch);
//! uint32_t BladerfShimApiVersion(void);
//! ```

#![allow(non_upper_case_globals, non_snake_case)]

use std::ffi::{c_int, c_void};

use crate::channel;
use crate::consts;

/// Sentinel address that is compared, never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Sentinel(*mut c_void);

// SAFETY: the pointer is only ever read as an address value.
unsafe impl Sync for Sentinel {}

impl Sentinel {
    const fn from_addr(addr: usize) -> Self {
        Sentinel(addr as *mut c_void)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    pub fn addr(self) -> usize {
        self.0 as usize
    }

    /// Whether a pointer handed back by a stream callback is this sentinel.
    pub fn is(self, ptr: *const c_void) -> bool {
        std::ptr::eq(self.0 as *const c_void, ptr)
    }
}

#[unsafe(no_mangle)]
pub static ReTuneNow: u64 = consts::RETUNE_NOW;

#[unsafe(no_mangle)]
pub static MetaFlagTxBurstStart: u32 = consts::META_FLAG_TX_BURST_START;
#[unsafe(no_mangle)]
pub static MetaFlagTxBurstEnd: u32 = consts::META_FLAG_TX_BURST_END;
#[unsafe(no_mangle)]
pub static MetaFlagTxNow: u32 = consts::META_FLAG_TX_NOW;
#[unsafe(no_mangle)]
pub static MetaFlagTxUpdateTimestamp: u32 = consts::META_FLAG_TX_UPDATE_TIMESTAMP;

#[unsafe(no_mangle)]
pub static MetaFlagRxNow: u32 = consts::META_FLAG_RX_NOW;
#[unsafe(no_mangle)]
pub static MetaFlagRxHwUnderflow: u32 = consts::META_FLAG_RX_HW_UNDERFLOW;
#[unsafe(no_mangle)]
pub static MetaFlagRxHwMiniexp1: u32 = consts::META_FLAG_RX_HW_MINIEXP1;
#[unsafe(no_mangle)]
pub static MetaFlagRxHwMiniexp2: u32 = consts::META_FLAG_RX_HW_MINIEXP2;

#[unsafe(no_mangle)]
pub static MetaStatusOverrun: u32 = consts::META_STATUS_OVERRUN;
#[unsafe(no_mangle)]
pub static MetaStatusUnderrun: u32 = consts::META_STATUS_UNDERRUN;

#[unsafe(no_mangle)]
pub static TriggerRegArm: u8 = consts::TRIGGER_REG_ARM;
#[unsafe(no_mangle)]
pub static TriggerRegFire: u8 = consts::TRIGGER_REG_FIRE;
#[unsafe(no_mangle)]
pub static TriggerRegMaster: u8 = consts::TRIGGER_REG_MASTER;
#[unsafe(no_mangle)]
pub static TriggerRegLine: u8 = consts::TRIGGER_REG_LINE;

#[unsafe(no_mangle)]
pub static StreamNoData: Sentinel = Sentinel::from_addr(consts::STREAM_NO_DATA);
#[unsafe(no_mangle)]
pub static StreamShutdown: Sentinel = Sentinel::from_addr(consts::STREAM_SHUTDOWN);

#[unsafe(no_mangle)]
pub static ChannelInvalid: c_int = consts::CHANNEL_INVALID;
#[unsafe(no_mangle)]
pub static ModuleInvalid: c_int = consts::MODULE_INVALID;
#[unsafe(no_mangle)]
pub static ModuleRx: c_int = consts::MODULE_RX;
#[unsafe(no_mangle)]
pub static ModuleTx: c_int = consts::MODULE_TX;

/// `BLADERF_CHANNEL_RX(ch)`
#[unsafe(no_mangle)]
pub extern "C" fn ChannelRx(ch: c_int) -> c_int {
    channel::channel_rx(ch)
}

/// `BLADERF_CHANNEL_TX(ch)`
#[unsafe(no_mangle)]
pub extern "C" fn ChannelTx(ch: c_int) -> c_int {
    channel::channel_tx(ch)
}

/// `BLADERF_CHANNEL_IS_TX(ch)`
#[unsafe(no_mangle)]
pub extern "C" fn ChannelIsTx(ch: c_int) -> c_int {
    channel::channel_is_tx(ch)
}

/// API version of the header the constants were pinned against.
///
/// Callers should compare this with `bladerf_version()` of the loaded
/// library before trusting the constants.
#[unsafe(no_mangle)]
pub extern "C" fn BladerfShimApiVersion() -> u32 {
    consts::LIBBLADERF_API_VERSION
}
