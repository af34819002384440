//! Channel identifier encoding.
//!
//! libbladeRF packs a zero-based channel index and a direction bit into one
//! `bladerf_channel` integer: `(index << 1) | direction`. RX is direction 0,
//! TX is direction 1, so RX channels are even and TX channels are odd.

use std::fmt;

use crate::error::{Error, Result};

/// `BLADERF_RX` from `bladerf_direction`
pub const BLADERF_RX: i32 = 0;
/// `BLADERF_TX` from `bladerf_direction`
pub const BLADERF_TX: i32 = 1;

/// `BLADERF_CHANNEL_RX(ch)`
///
/// No range check: the shift wraps the same way the C macro does on a
/// two's-complement `int`.
pub const fn channel_rx(ch: i32) -> i32 {
    ch.wrapping_shl(1) | BLADERF_RX
}

/// `BLADERF_CHANNEL_TX(ch)`
pub const fn channel_tx(ch: i32) -> i32 {
    ch.wrapping_shl(1) | BLADERF_TX
}

/// `BLADERF_CHANNEL_IS_TX(ch)`
///
/// Returns the masked direction bit, not a normalized boolean. Only the
/// direction bit is inspected.
pub const fn channel_is_tx(ch: i32) -> i32 {
    ch & BLADERF_TX
}

/// Stream direction (`bladerf_direction`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Direction {
    /// Receive direction
    Rx = BLADERF_RX,
    /// Transmit direction
    Tx = BLADERF_TX,
}

impl Direction {
    /// Name of the vendor enumerator.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Rx => "BLADERF_RX",
            Direction::Tx => "BLADERF_TX",
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            BLADERF_RX => Ok(Direction::Rx),
            BLADERF_TX => Ok(Direction::Tx),
            other => Err(Error::UnknownValue {
                kind: "bladerf_direction",
                value: other as i64,
            }),
        }
    }
}

/// An encoded `bladerf_channel` identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Channel(i32);

impl Channel {
    /// `BLADERF_CHANNEL_INVALID`
    pub const INVALID: Channel = Channel(-1);

    /// Encode a zero-based RX channel index.
    pub const fn rx(index: i32) -> Self {
        Channel(channel_rx(index))
    }

    /// Encode a zero-based TX channel index.
    pub const fn tx(index: i32) -> Self {
        Channel(channel_tx(index))
    }

    /// Encode an index for the given direction.
    pub const fn new(index: i32, direction: Direction) -> Self {
        match direction {
            Direction::Rx => Self::rx(index),
            Direction::Tx => Self::tx(index),
        }
    }

    /// Wrap a raw identifier as returned by libbladeRF.
    pub const fn from_raw(raw: i32) -> Self {
        Channel(raw)
    }

    /// The raw identifier passed across the C boundary.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// True when the direction bit is set.
    pub const fn is_tx(self) -> bool {
        channel_is_tx(self.0) != 0
    }

    /// Direction encoded in the low bit.
    pub const fn direction(self) -> Direction {
        if self.is_tx() {
            Direction::Tx
        } else {
            Direction::Rx
        }
    }

    /// Zero-based channel index (arithmetic shift, matching `ch >> 1` in C).
    pub const fn index(self) -> i32 {
        self.0 >> 1
    }

    /// Whether the identifier could have come out of the encoding macros
    /// for a non-negative index.
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl From<Channel> for i32 {
    fn from(channel: Channel) -> Self {
        channel.0
    }
}

impl From<i32> for Channel {
    fn from(raw: i32) -> Self {
        Channel(raw)
    }
}

impl fmt::Display for Channel {
    /// Formats as the 1-based labels bladeRF-cli prints (`RX1`, `TX2`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "INVALID");
        }
        let prefix = match self.direction() {
            Direction::Rx => "RX",
            Direction::Tx => "TX",
        };
        write!(f, "{}{}", prefix, self.index() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_values() {
        assert_eq!(channel_rx(0), 0);
        assert_eq!(channel_tx(0), 1);
        assert_eq!(channel_rx(1), 2);
        assert_eq!(channel_tx(1), 3);
        assert_eq!(channel_rx(7), 14);
        assert_eq!(channel_tx(7), 15);
    }

    #[test]
    fn test_direction_bit() {
        for n in [0, 1, 7] {
            assert_ne!(channel_is_tx(channel_tx(n)), 0);
            assert_eq!(channel_is_tx(channel_rx(n)), 0);
            assert_ne!(channel_rx(n), channel_tx(n));
        }
    }

    #[test]
    fn test_rx_tx_differ_only_in_direction_bit() {
        assert_eq!(channel_rx(0) ^ channel_tx(0), BLADERF_TX);
    }

    #[test]
    fn test_no_range_validation() {
        // Pass-through: negative and huge indices encode without complaint
        assert_eq!(channel_rx(-1), -2);
        assert_eq!(channel_tx(-1), -1);
        assert_eq!(channel_rx(i32::MAX), -2);
        assert_eq!(channel_is_tx(-1), 1);
    }

    #[test]
    fn test_is_tx_ignores_other_bits() {
        assert_eq!(channel_is_tx(0x7ffe), 0);
        assert_eq!(channel_is_tx(0x7fff), 1);
    }

    #[test]
    fn test_channel_accessors() {
        let ch = Channel::tx(1);
        assert_eq!(ch.raw(), 3);
        assert_eq!(ch.index(), 1);
        assert_eq!(ch.direction(), Direction::Tx);
        assert!(ch.is_tx());
        assert_eq!(Channel::new(1, Direction::Rx), Channel::rx(1));
        assert_eq!(Channel::from_raw(2).direction(), Direction::Rx);
    }

    #[test]
    fn test_invalid_channel() {
        assert_eq!(Channel::INVALID.raw(), -1);
        assert!(!Channel::INVALID.is_valid());
        assert_eq!(Channel::INVALID.to_string(), "INVALID");
    }

    #[test]
    fn test_display() {
        assert_eq!(Channel::rx(0).to_string(), "RX1");
        assert_eq!(Channel::tx(1).to_string(), "TX2");
    }

    #[test]
    fn test_direction_try_from() {
        assert_eq!(Direction::try_from(1).unwrap(), Direction::Tx);
        assert!(Direction::try_from(2).is_err());
    }
}
