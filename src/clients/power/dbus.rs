use serde::Serialize;
use std::fmt::{Display, Formatter};
use zbus::proxy;

/// Device struct as sent by the power manager:
/// `(id, type, summary, percentage, state, time)`.
pub type DeviceTuple = (String, u32, String, f64, u32, u64);

#[proxy(
    interface = "org.gnome.PowerManager",
    default_service = "org.gnome.PowerManager",
    default_path = "/org/gnome/PowerManager"
)]
pub(super) trait PowerManager {
    /// GetDevices method
    fn get_devices(&self) -> zbus::Result<Vec<DeviceTuple>>;

    /// GetPrimaryDevice method
    fn get_primary_device(&self) -> zbus::Result<DeviceTuple>;

    /// Changed signal
    #[zbus(signal)]
    fn changed(&self) -> zbus::Result<()>;

    /// Icon property
    #[zbus(property)]
    fn icon(&self) -> zbus::Result<String>;
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum DeviceType {
    #[default]
    Unknown = 0,
    AcPower = 1,
    Battery = 2,
    Ups = 3,
    Monitor = 4,
    Mouse = 5,
    Keyboard = 6,
    Pda = 7,
    Phone = 8,
}

impl From<u32> for DeviceType {
    fn from(number: u32) -> Self {
        match number {
            1 => Self::AcPower,
            2 => Self::Battery,
            3 => Self::Ups,
            4 => Self::Monitor,
            5 => Self::Mouse,
            6 => Self::Keyboard,
            7 => Self::Pda,
            8 => Self::Phone,
            _ => Self::Unknown,
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "Unknown",
            Self::AcPower => "AC power",
            Self::Battery => "Battery",
            Self::Ups => "UPS",
            Self::Monitor => "Monitor",
            Self::Mouse => "Mouse",
            Self::Keyboard => "Keyboard",
            Self::Pda => "PDA",
            Self::Phone => "Phone",
        };

        write!(f, "{name}")
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum DeviceState {
    #[default]
    Unknown = 0,
    Charging = 1,
    Discharging = 2,
    Empty = 3,
    FullyCharged = 4,
    PendingCharge = 5,
    PendingDischarge = 6,
}

impl From<u32> for DeviceState {
    fn from(number: u32) -> Self {
        match number {
            1 => Self::Charging,
            2 => Self::Discharging,
            3 => Self::Empty,
            4 => Self::FullyCharged,
            5 => Self::PendingCharge,
            6 => Self::PendingDischarge,
            _ => Self::Unknown,
        }
    }
}

impl Display for DeviceState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "Unknown",
            Self::Charging => "Charging",
            Self::Discharging => "Discharging",
            Self::Empty => "Empty",
            Self::FullyCharged => "Fully charged",
            Self::PendingCharge => "Pending charge",
            Self::PendingDischarge => "Pending discharge",
        };

        write!(f, "{name}")
    }
}
