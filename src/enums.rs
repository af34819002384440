//! Typed mirrors of the plain C enums in `libbladeRF.h`.
//!
//! These are real enums in the vendor header, so C callers already see them.
//! On the Rust side they give raw `int`s coming back from libbladeRF a
//! checked type.

use std::fmt;

use crate::channel::Direction;
use crate::error::{Error, Result};

macro_rules! vendor_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $c_type:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $c_name:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            /// Every variant, in header order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// C identifier of the variant.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $c_name, )+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = Error;

            fn try_from(value: i32) -> Result<Self> {
                match value {
                    $( $value => Ok($name::$variant), )+
                    other => Err(Error::UnknownValue {
                        kind: $c_type,
                        value: other as i64,
                    }),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value as i32
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

vendor_enum! {
    /// libbladeRF backend selection
    pub enum Backend: "bladerf_backend" {
        Any = 0 => "BLADERF_BACKEND_ANY",
        Linux = 1 => "BLADERF_BACKEND_LINUX",
        LibUsb = 2 => "BLADERF_BACKEND_LIBUSB",
        Cypress = 3 => "BLADERF_BACKEND_CYPRESS",
        Dummy = 100 => "BLADERF_BACKEND_DUMMY",
    }
}

vendor_enum! {
    /// Stream channel layout
    pub enum ChannelLayout: "bladerf_channel_layout" {
        RxX1 = 0 => "BLADERF_RX_X1",
        TxX1 = 1 => "BLADERF_TX_X1",
        RxX2 = 2 => "BLADERF_RX_X2",
        TxX2 = 3 => "BLADERF_TX_X2",
    }
}

impl ChannelLayout {
    /// The low bit of a layout is its direction, like channel identifiers.
    pub fn direction(self) -> Direction {
        if (self as i32) & 1 == 0 {
            Direction::Rx
        } else {
            Direction::Tx
        }
    }

    pub fn channel_count(self) -> usize {
        match self {
            ChannelLayout::RxX1 | ChannelLayout::TxX1 => 1,
            ChannelLayout::RxX2 | ChannelLayout::TxX2 => 2,
        }
    }
}

vendor_enum! {
    /// Reference clock selection (bladeRF 2.0 micro)
    pub enum ClockSelect: "bladerf_clock_select" {
        Onboard = 0 => "CLOCK_SELECT_ONBOARD",
        External = 1 => "CLOCK_SELECT_EXTERNAL",
    }
}

vendor_enum! {
    /// IQ correction parameter
    pub enum Correction: "bladerf_correction" {
        DcOffI = 0 => "BLADERF_CORR_DCOFF_I",
        DcOffQ = 1 => "BLADERF_CORR_DCOFF_Q",
        Phase = 2 => "BLADERF_CORR_PHASE",
        Gain = 3 => "BLADERF_CORR_GAIN",
    }
}

vendor_enum! {
    /// USB link speed
    pub enum DeviceSpeed: "bladerf_dev_speed" {
        Unknown = 0 => "BLADERF_DEVICE_SPEED_UNKNOWN",
        High = 1 => "BLADERF_DEVICE_SPEED_HIGH",
        Super = 2 => "BLADERF_DEVICE_SPEED_SUPER",
    }
}

vendor_enum! {
    /// Sample format
    pub enum Format: "bladerf_format" {
        /// Signed 16-bit I/Q, 12-bit significant (Q11)
        Sc16Q11 = 0 => "BLADERF_FORMAT_SC16_Q11",
        /// SC16 Q11 with metadata header
        Sc16Q11Meta = 1 => "BLADERF_FORMAT_SC16_Q11_META",
        PacketMeta = 2 => "BLADERF_FORMAT_PACKET_META",
        Sc8Q7 = 3 => "BLADERF_FORMAT_SC8_Q7",
        Sc8Q7Meta = 4 => "BLADERF_FORMAT_SC8_Q7_META",
    }
}

impl Format {
    /// Bytes per complex sample.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            Format::Sc8Q7 | Format::Sc8Q7Meta => 2,
            _ => 4,
        }
    }

    pub fn has_metadata(self) -> bool {
        matches!(
            self,
            Format::Sc16Q11Meta | Format::PacketMeta | Format::Sc8Q7Meta
        )
    }
}

vendor_enum! {
    /// FPGA part size
    pub enum FpgaSize: "bladerf_fpga_size" {
        Unknown = 0 => "BLADERF_FPGA_UNKNOWN",
        Kle40 = 40 => "BLADERF_FPGA_40KLE",
        Kle115 = 115 => "BLADERF_FPGA_115KLE",
        A4 = 49 => "BLADERF_FPGA_A4",
        A5 = 77 => "BLADERF_FPGA_A5",
        A9 = 301 => "BLADERF_FPGA_A9",
    }
}

vendor_enum! {
    /// Where the running FPGA image was loaded from
    pub enum FpgaSource: "bladerf_fpga_source" {
        Unknown = 0 => "BLADERF_FPGA_SOURCE_UNKNOWN",
        Flash = 1 => "BLADERF_FPGA_SOURCE_FLASH",
        Host = 2 => "BLADERF_FPGA_SOURCE_HOST",
    }
}

vendor_enum! {
    /// Gain control mode
    pub enum GainMode: "bladerf_gain_mode" {
        Default = 0 => "BLADERF_GAIN_DEFAULT",
        /// Manual gain control
        Manual = 1 => "BLADERF_GAIN_MGC",
        FastAttackAgc = 2 => "BLADERF_GAIN_FASTATTACK_AGC",
        SlowAttackAgc = 3 => "BLADERF_GAIN_SLOWATTACK_AGC",
        HybridAgc = 4 => "BLADERF_GAIN_HYBRID_AGC",
    }
}

vendor_enum! {
    /// Loopback mode
    pub enum Loopback: "bladerf_loopback" {
        None = 0 => "BLADERF_LB_NONE",
        Firmware = 1 => "BLADERF_LB_FIRMWARE",
        BbTxlpfRxvga2 = 2 => "BLADERF_LB_BB_TXLPF_RXVGA2",
        BbTxvga1Rxvga2 = 3 => "BLADERF_LB_BB_TXVGA1_RXVGA2",
        BbTxlpfRxlpf = 4 => "BLADERF_LB_BB_TXLPF_RXLPF",
        BbTxvga1Rxlpf = 5 => "BLADERF_LB_BB_TXVGA1_RXLPF",
        RfLna1 = 6 => "BLADERF_LB_RF_LNA1",
        RfLna2 = 7 => "BLADERF_LB_RF_LNA2",
        RfLna3 = 8 => "BLADERF_LB_RF_LNA3",
        RficBist = 9 => "BLADERF_LB_RFIC_BIST",
    }
}

vendor_enum! {
    /// Power monitor (INA219) register
    pub enum PmicRegister: "bladerf_pmic_register" {
        Configuration = 0 => "BLADERF_PMIC_CONFIGURATION",
        VoltageShunt = 1 => "BLADERF_PMIC_VOLTAGE_SHUNT",
        VoltageBus = 2 => "BLADERF_PMIC_VOLTAGE_BUS",
        Power = 3 => "BLADERF_PMIC_POWER",
        Current = 4 => "BLADERF_PMIC_CURRENT",
        Calibration = 5 => "BLADERF_PMIC_CALIBRATION",
    }
}

vendor_enum! {
    pub enum PowerSource: "bladerf_power_sources" {
        Unknown = 0 => "BLADERF_UNKNOWN",
        Dc = 1 => "BLADERF_PS_DC",
        UsbVbus = 2 => "BLADERF_PS_USB_VBUS",
    }
}

vendor_enum! {
    /// RX sample source multiplexer
    pub enum RxMux: "bladerf_rx_mux" {
        Invalid = -1 => "BLADERF_RX_MUX_INVALID",
        Baseband = 0 => "BLADERF_RX_MUX_BASEBAND",
        Counter12Bit = 1 => "BLADERF_RX_MUX_12BIT_COUNTER",
        Counter32Bit = 2 => "BLADERF_RX_MUX_32BIT_COUNTER",
        DigitalLoopback = 4 => "BLADERF_RX_MUX_DIGITAL_LOOPBACK",
    }
}

vendor_enum! {
    /// Role of a device in a synchronized trigger chain
    pub enum TriggerRole: "bladerf_trigger_role" {
        Invalid = -1 => "BLADERF_TRIGGER_ROLE_INVALID",
        Disabled = 0 => "BLADERF_TRIGGER_ROLE_DISABLED",
        Master = 1 => "BLADERF_TRIGGER_ROLE_MASTER",
        Slave = 2 => "BLADERF_TRIGGER_ROLE_SLAVE",
    }
}

vendor_enum! {
    /// Physical line carrying the trigger signal
    pub enum TriggerSignal: "bladerf_trigger_signal" {
        Invalid = -1 => "BLADERF_TRIGGER_INVALID",
        J71Pin4 = 0 => "BLADERF_TRIGGER_J71_4",
        J51Pin1 = 1 => "BLADERF_TRIGGER_J51_1",
        MiniExp1 = 2 => "BLADERF_TRIGGER_MINI_EXP_1",
        User0 = 128 => "BLADERF_TRIGGER_USER_0",
        User1 = 129 => "BLADERF_TRIGGER_USER_1",
        User2 = 130 => "BLADERF_TRIGGER_USER_2",
        User3 = 131 => "BLADERF_TRIGGER_USER_3",
        User4 = 132 => "BLADERF_TRIGGER_USER_4",
        User5 = 133 => "BLADERF_TRIGGER_USER_5",
        User6 = 134 => "BLADERF_TRIGGER_USER_6",
        User7 = 135 => "BLADERF_TRIGGER_USER_7",
    }
}

vendor_enum! {
    pub enum ExpansionBoard: "bladerf_xb" {
        None = 0 => "BLADERF_XB_NONE",
        Xb100 = 1 => "BLADERF_XB_100",
        Xb200 = 2 => "BLADERF_XB_200",
        Xb300 = 3 => "BLADERF_XB_300",
    }
}

vendor_enum! {
    /// VCTCXO tamer reference input
    pub enum VctcxoTamerMode: "bladerf_vctcxo_tamer_mode" {
        Invalid = -1 => "BLADERF_VCTCXO_TAMER_INVALID",
        Disabled = 0 => "BLADERF_VCTCXO_TAMER_DISABLED",
        OnePps = 1 => "BLADERF_VCTCXO_TAMER_1_PPS",
        TenMhz = 2 => "BLADERF_VCTCXO_TAMER_10_MHZ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_variants() {
        for layout in ChannelLayout::ALL {
            assert_eq!(ChannelLayout::try_from(i32::from(*layout)).unwrap(), *layout);
        }
        for signal in TriggerSignal::ALL {
            assert_eq!(TriggerSignal::try_from(*signal as i32).unwrap(), *signal);
        }
    }

    #[test]
    fn test_unknown_value() {
        let err = GainMode::try_from(9).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownValue {
                kind: "bladerf_gain_mode",
                value: 9
            }
        ));
        assert_eq!(err.to_string(), "Invalid bladerf_gain_mode value: 9");
    }

    #[test]
    fn test_negative_discriminants() {
        assert_eq!(RxMux::try_from(-1).unwrap(), RxMux::Invalid);
        assert_eq!(TriggerRole::Invalid as i32, -1);
    }

    #[test]
    fn test_names() {
        assert_eq!(GainMode::Manual.name(), "BLADERF_GAIN_MGC");
        assert_eq!(FpgaSize::A9.to_string(), "BLADERF_FPGA_A9");
        assert_eq!(Backend::Dummy as i32, 100);
    }

    #[test]
    fn test_channel_layout_direction() {
        assert_eq!(ChannelLayout::RxX2.direction(), Direction::Rx);
        assert_eq!(ChannelLayout::TxX1.direction(), Direction::Tx);
        assert_eq!(ChannelLayout::TxX2.channel_count(), 2);
    }

    #[test]
    fn test_format_properties() {
        assert_eq!(Format::Sc16Q11.bytes_per_sample(), 4);
        assert_eq!(Format::Sc8Q7Meta.bytes_per_sample(), 2);
        assert!(Format::Sc16Q11Meta.has_metadata());
        assert!(!Format::Sc16Q11.has_metadata());
    }
}
