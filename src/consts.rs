//! Pinned snapshot of the libbladeRF header macros.
//!
//! Every value here must match `libbladeRF.h` for [`LIBBLADERF_API_VERSION`].
//! Use [`crate::header::verify`] (or `bladerf-table verify`) against the
//! installed header when bumping the vendor library.

use crate::channel::{BLADERF_RX, BLADERF_TX, channel_rx, channel_tx};

/// `LIBBLADERF_API_VERSION` of the header this table was taken from (2.5.0).
pub const LIBBLADERF_API_VERSION: u32 = 0x0205_0000;

/// Timestamp meaning "retune immediately" (`BLADERF_RETUNE_NOW`)
pub const RETUNE_NOW: u64 = 0;

// TX metadata flags
pub const META_FLAG_TX_BURST_START: u32 = 1 << 0;
pub const META_FLAG_TX_BURST_END: u32 = 1 << 1;
pub const META_FLAG_TX_NOW: u32 = 1 << 2;
pub const META_FLAG_TX_UPDATE_TIMESTAMP: u32 = 1 << 3;

// RX metadata flags
pub const META_FLAG_RX_NOW: u32 = 1 << 31;
pub const META_FLAG_RX_HW_UNDERFLOW: u32 = 1 << 0;
pub const META_FLAG_RX_HW_MINIEXP1: u32 = 1 << 16;
pub const META_FLAG_RX_HW_MINIEXP2: u32 = 1 << 17;

// Metadata status bits
pub const META_STATUS_OVERRUN: u32 = 1 << 0;
pub const META_STATUS_UNDERRUN: u32 = 1 << 1;

// Trigger control register bits
pub const TRIGGER_REG_ARM: u8 = 1 << 0;
pub const TRIGGER_REG_FIRE: u8 = 1 << 1;
pub const TRIGGER_REG_MASTER: u8 = 1 << 2;
pub const TRIGGER_REG_LINE: u8 = 1 << 3;

/// Address of `BLADERF_STREAM_NO_DATA`, i.e. `(void *)(-1)`
pub const STREAM_NO_DATA: usize = usize::MAX;
/// Address of `BLADERF_STREAM_SHUTDOWN`, i.e. `NULL`
pub const STREAM_SHUTDOWN: usize = 0;

pub const CHANNEL_INVALID: i32 = -1;

// Legacy module aliases
pub const MODULE_INVALID: i32 = CHANNEL_INVALID;
pub const MODULE_RX: i32 = channel_rx(0);
pub const MODULE_TX: i32 = channel_tx(0);

/// C type a macro expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroType {
    U8,
    U32,
    U64,
    /// Plain `int` (`bladerf_channel` and friends)
    Int,
    /// `void *` sentinel, compared by address
    Pointer,
}

impl MacroType {
    /// Bit width of the type on this target.
    pub const fn bits(self) -> u32 {
        match self {
            MacroType::U8 => 8,
            MacroType::U32 | MacroType::Int => 32,
            MacroType::U64 => 64,
            MacroType::Pointer => usize::BITS,
        }
    }

    /// All-ones mask of the type's width.
    pub const fn mask(self) -> u64 {
        match self.bits() {
            64 => u64::MAX,
            bits => (1u64 << bits) - 1,
        }
    }

    /// Reduce an evaluated C expression to the bit pattern stored in a
    /// variable of this type.
    pub const fn truncate(self, value: i64) -> u64 {
        (value as u64) & self.mask()
    }

    /// C spelling of the type, as used in the exported header.
    pub fn c_name(self) -> &'static str {
        match self {
            MacroType::U8 => "uint8_t",
            MacroType::U32 => "uint32_t",
            MacroType::U64 => "uint64_t",
            MacroType::Int => "int",
            MacroType::Pointer => "void *",
        }
    }
}

/// One re-exported macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroDef {
    /// Name in `libbladeRF.h`
    pub macro_name: &'static str,
    /// Exported C symbol in [`crate::ffi`]
    pub symbol: &'static str,
    pub ty: MacroType,
    /// Bit pattern, already truncated to `ty`
    pub value: u64,
}

impl MacroDef {
    const fn new(
        macro_name: &'static str,
        symbol: &'static str,
        ty: MacroType,
        value: i64,
    ) -> Self {
        MacroDef {
            macro_name,
            symbol,
            ty,
            value: ty.truncate(value),
        }
    }

    /// Find a row by macro name or exported symbol.
    pub fn lookup(name: &str) -> Option<&'static MacroDef> {
        MACROS
            .iter()
            .find(|def| def.macro_name == name || def.symbol == name)
    }

    /// Whether an evaluated header value matches the pinned one.
    pub fn matches(&self, evaluated: i64) -> bool {
        self.ty.truncate(evaluated) == self.value
    }

    /// Value rendered as a hex literal of the type's width.
    pub fn hex(&self) -> String {
        let digits = (self.ty.bits() / 4) as usize;
        format!("0x{:0width$x}", self.value, width = digits)
    }
}

/// Every macro the shim exports, in header order.
pub static MACROS: &[MacroDef] = &[
    MacroDef::new(
        "BLADERF_CHANNEL_INVALID",
        "ChannelInvalid",
        MacroType::Int,
        CHANNEL_INVALID as i64,
    ),
    MacroDef::new("BLADERF_MODULE_INVALID", "ModuleInvalid", MacroType::Int, MODULE_INVALID as i64),
    MacroDef::new("BLADERF_MODULE_RX", "ModuleRx", MacroType::Int, MODULE_RX as i64),
    MacroDef::new("BLADERF_MODULE_TX", "ModuleTx", MacroType::Int, MODULE_TX as i64),
    MacroDef::new("BLADERF_RETUNE_NOW", "ReTuneNow", MacroType::U64, RETUNE_NOW as i64),
    MacroDef::new(
        "BLADERF_META_STATUS_OVERRUN",
        "MetaStatusOverrun",
        MacroType::U32,
        META_STATUS_OVERRUN as i64,
    ),
    MacroDef::new(
        "BLADERF_META_STATUS_UNDERRUN",
        "MetaStatusUnderrun",
        MacroType::U32,
        META_STATUS_UNDERRUN as i64,
    ),
    MacroDef::new(
        "BLADERF_META_FLAG_TX_BURST_START",
        "MetaFlagTxBurstStart",
        MacroType::U32,
        META_FLAG_TX_BURST_START as i64,
    ),
    MacroDef::new(
        "BLADERF_META_FLAG_TX_BURST_END",
        "MetaFlagTxBurstEnd",
        MacroType::U32,
        META_FLAG_TX_BURST_END as i64,
    ),
    MacroDef::new(
        "BLADERF_META_FLAG_TX_NOW",
        "MetaFlagTxNow",
        MacroType::U32,
        META_FLAG_TX_NOW as i64,
    ),
    MacroDef::new(
        "BLADERF_META_FLAG_TX_UPDATE_TIMESTAMP",
        "MetaFlagTxUpdateTimestamp",
        MacroType::U32,
        META_FLAG_TX_UPDATE_TIMESTAMP as i64,
    ),
    MacroDef::new(
        "BLADERF_META_FLAG_RX_NOW",
        "MetaFlagRxNow",
        MacroType::U32,
        META_FLAG_RX_NOW as i64,
    ),
    MacroDef::new(
        "BLADERF_META_FLAG_RX_HW_UNDERFLOW",
        "MetaFlagRxHwUnderflow",
        MacroType::U32,
        META_FLAG_RX_HW_UNDERFLOW as i64,
    ),
    MacroDef::new(
        "BLADERF_META_FLAG_RX_HW_MINIEXP1",
        "MetaFlagRxHwMiniexp1",
        MacroType::U32,
        META_FLAG_RX_HW_MINIEXP1 as i64,
    ),
    MacroDef::new(
        "BLADERF_META_FLAG_RX_HW_MINIEXP2",
        "MetaFlagRxHwMiniexp2",
        MacroType::U32,
        META_FLAG_RX_HW_MINIEXP2 as i64,
    ),
    MacroDef::new(
        "BLADERF_TRIGGER_REG_ARM",
        "TriggerRegArm",
        MacroType::U8,
        TRIGGER_REG_ARM as i64,
    ),
    MacroDef::new(
        "BLADERF_TRIGGER_REG_FIRE",
        "TriggerRegFire",
        MacroType::U8,
        TRIGGER_REG_FIRE as i64,
    ),
    MacroDef::new(
        "BLADERF_TRIGGER_REG_MASTER",
        "TriggerRegMaster",
        MacroType::U8,
        TRIGGER_REG_MASTER as i64,
    ),
    MacroDef::new(
        "BLADERF_TRIGGER_REG_LINE",
        "TriggerRegLine",
        MacroType::U8,
        TRIGGER_REG_LINE as i64,
    ),
    MacroDef::new(
        "BLADERF_STREAM_SHUTDOWN",
        "StreamShutdown",
        MacroType::Pointer,
        STREAM_SHUTDOWN as i64,
    ),
    MacroDef::new(
        "BLADERF_STREAM_NO_DATA",
        "StreamNoData",
        MacroType::Pointer,
        STREAM_NO_DATA as i64,
    ),
];

const fn single_distinct_bits(flags: &[u32]) -> bool {
    let mut seen = 0u32;
    let mut i = 0;
    while i < flags.len() {
        if flags[i].count_ones() != 1 || seen & flags[i] != 0 {
            return false;
        }
        seen |= flags[i];
        i += 1;
    }
    true
}

const _: () = assert!(single_distinct_bits(&[
    META_FLAG_TX_BURST_START,
    META_FLAG_TX_BURST_END,
    META_FLAG_TX_NOW,
    META_FLAG_TX_UPDATE_TIMESTAMP,
]));
const _: () = assert!(single_distinct_bits(&[
    META_FLAG_RX_NOW,
    META_FLAG_RX_HW_UNDERFLOW,
    META_FLAG_RX_HW_MINIEXP1,
    META_FLAG_RX_HW_MINIEXP2,
]));
const _: () = assert!(single_distinct_bits(&[META_STATUS_OVERRUN, META_STATUS_UNDERRUN]));
const _: () = assert!(single_distinct_bits(&[
    TRIGGER_REG_ARM as u32,
    TRIGGER_REG_FIRE as u32,
    TRIGGER_REG_MASTER as u32,
    TRIGGER_REG_LINE as u32,
]));
const _: () = assert!(MODULE_RX & 1 == BLADERF_RX && MODULE_TX & 1 == BLADERF_TX);
const _: () = assert!(STREAM_NO_DATA != STREAM_SHUTDOWN);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_names_unique() {
        let macros: HashSet<_> = MACROS.iter().map(|d| d.macro_name).collect();
        let symbols: HashSet<_> = MACROS.iter().map(|d| d.symbol).collect();
        assert_eq!(macros.len(), MACROS.len());
        assert_eq!(symbols.len(), MACROS.len());
    }

    #[test]
    fn test_lookup_by_either_name() {
        let by_macro = MacroDef::lookup("BLADERF_META_FLAG_RX_NOW").unwrap();
        let by_symbol = MacroDef::lookup("MetaFlagRxNow").unwrap();
        assert_eq!(by_macro, by_symbol);
        assert_eq!(by_macro.value, 0x8000_0000);
        assert!(MacroDef::lookup("BLADERF_NOPE").is_none());
    }

    #[test]
    fn test_truncation() {
        assert_eq!(MacroType::Int.truncate(-1), 0xffff_ffff);
        assert_eq!(MacroType::U8.truncate(0x1ff), 0xff);
        assert_eq!(MacroType::U64.truncate(-1), u64::MAX);
        assert_eq!(MacroType::Pointer.truncate(-1), usize::MAX as u64);
    }

    #[test]
    fn test_matches_sign_extended_values() {
        let invalid = MacroDef::lookup("BLADERF_CHANNEL_INVALID").unwrap();
        assert!(invalid.matches(-1));
        assert!(invalid.matches(0xffff_ffff));
        assert!(!invalid.matches(0));
    }

    #[test]
    fn test_hex_rendering() {
        let arm = MacroDef::lookup("TriggerRegArm").unwrap();
        assert_eq!(arm.hex(), "0x01");
        let rx_now = MacroDef::lookup("MetaFlagRxNow").unwrap();
        assert_eq!(rx_now.hex(), "0x80000000");
    }

    #[test]
    fn test_module_aliases() {
        assert_eq!(MODULE_RX, 0);
        assert_eq!(MODULE_TX, 1);
        assert_eq!(MODULE_INVALID, -1);
    }
}
