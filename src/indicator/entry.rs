use crate::clients::power::{DeviceRecord, DeviceState};
use crate::menu::RowContent;
use crate::process::shell_quote;
use std::fmt::Write;

const DAY: u64 = 24 * 60 * 60;
const HOUR: u64 = 60 * 60;
const MINUTE: u64 = 60;

pub const FULLY_CHARGED_ICON: &str = "battery-full-charged";
pub const MISSING_ICON: &str = "battery-missing";

/// Menu row for a single non-primary device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceMenuEntry {
    pub device_id: String,
    pub icon: String,
    pub label: String,
    pub percentage: String,
    pub tooltip: Option<String>,
}

impl DeviceMenuEntry {
    pub fn new(device: &DeviceRecord) -> Self {
        Self {
            device_id: device.id.clone(),
            icon: icon_for(device.state, device.percentage),
            label: device.summary.clone(),
            percentage: percentage_label(device.percentage),
            tooltip: time_remaining_label(device.state, device.time_remaining),
        }
    }

    /// Converts the entry into a row which opens
    /// `statistics_command` for this device when activated.
    pub fn into_row(self, statistics_command: &str) -> RowContent {
        RowContent::Device {
            command: format!(
                "{statistics_command} --device {}",
                shell_quote(&self.device_id)
            ),
            icon: self.icon,
            label: self.label,
            percentage: self.percentage,
            tooltip: self.tooltip,
        }
    }
}

/// Picks the icon glyph for a device.
pub fn icon_for(state: DeviceState, percentage: f64) -> String {
    match state {
        DeviceState::FullyCharged => FULLY_CHARGED_ICON.to_string(),
        DeviceState::Unknown => MISSING_ICON.to_string(),
        DeviceState::Charging => format!("{}-charging", level_icon(percentage)),
        _ => level_icon(percentage).to_string(),
    }
}

fn level_icon(percentage: f64) -> &'static str {
    if percentage > 60.0 {
        "battery-full"
    } else if percentage > 30.0 {
        "battery-good"
    } else if percentage > 10.0 {
        "battery-low"
    } else if percentage > 0.0 {
        "battery-caution"
    } else {
        "battery-empty"
    }
}

/// Formats a percentage as a rounded whole number, ie `67%`.
pub fn percentage_label(percentage: f64) -> String {
    format!("{}%", percentage.round() as i64)
}

fn time_remaining_label(state: DeviceState, seconds: u64) -> Option<String> {
    if seconds == 0 {
        return None;
    }

    let prefix = match state {
        DeviceState::Charging | DeviceState::PendingCharge => "Full in",
        DeviceState::Discharging | DeviceState::PendingDischarge => "Empty in",
        _ => return None,
    };

    let time = seconds_to_string(seconds)?;
    if time.is_empty() {
        None
    } else {
        Some(format!("{prefix} {time}"))
    }
}

fn seconds_to_string(seconds: u64) -> Option<String> {
    let mut time_string = String::new();
    let days = seconds / DAY;
    if days > 0 {
        write!(time_string, "{days}d").ok()?;
    }
    let hours = (seconds % DAY) / HOUR;
    if hours > 0 {
        write!(time_string, " {hours}h").ok()?;
    }
    let minutes = (seconds % HOUR) / MINUTE;
    if minutes > 0 {
        write!(time_string, " {minutes}m").ok()?;
    }

    Some(time_string.trim_start().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::power::DeviceType;

    fn device(state: DeviceState, percentage: f64, time_remaining: u64) -> DeviceRecord {
        DeviceRecord {
            id: "/org/freedesktop/UPower/devices/mouse_dev_0".to_string(),
            kind: DeviceType::Mouse,
            summary: "Mouse".to_string(),
            percentage,
            state,
            time_remaining,
        }
    }

    #[test]
    fn fully_charged_ignores_percentage() {
        assert_eq!(icon_for(DeviceState::FullyCharged, 5.0), "battery-full-charged");
    }

    #[test]
    fn unknown_is_missing() {
        assert_eq!(icon_for(DeviceState::Unknown, 80.0), "battery-missing");
    }

    #[test]
    fn discharging_buckets() {
        assert_eq!(icon_for(DeviceState::Discharging, 61.0), "battery-full");
        assert_eq!(icon_for(DeviceState::Discharging, 60.0), "battery-good");
        assert_eq!(icon_for(DeviceState::Discharging, 45.0), "battery-good");
        assert_eq!(icon_for(DeviceState::Discharging, 30.0), "battery-low");
        assert_eq!(icon_for(DeviceState::Discharging, 10.0), "battery-caution");
        assert_eq!(icon_for(DeviceState::Discharging, 0.5), "battery-caution");
        assert_eq!(icon_for(DeviceState::Discharging, 0.0), "battery-empty");
    }

    #[test]
    fn charging_suffix() {
        assert_eq!(icon_for(DeviceState::Charging, 75.0), "battery-full-charging");
        assert_eq!(icon_for(DeviceState::Charging, 0.0), "battery-empty-charging");
    }

    #[test]
    fn pending_charge_has_no_suffix() {
        assert_eq!(icon_for(DeviceState::PendingCharge, 20.0), "battery-low");
        assert_eq!(icon_for(DeviceState::Empty, 0.0), "battery-empty");
    }

    #[test]
    fn percentage_rounds() {
        assert_eq!(percentage_label(66.6), "67%");
        assert_eq!(percentage_label(66.4), "66%");
        assert_eq!(percentage_label(100.0), "100%");
        assert_eq!(percentage_label(0.0), "0%");
    }

    #[test]
    fn tooltip_while_discharging() {
        let entry = DeviceMenuEntry::new(&device(DeviceState::Discharging, 50.0, 2 * HOUR + 300));
        assert_eq!(entry.tooltip.as_deref(), Some("Empty in 2h 5m"));
    }

    #[test]
    fn tooltip_while_charging() {
        let entry = DeviceMenuEntry::new(&device(DeviceState::Charging, 50.0, DAY + 60));
        assert_eq!(entry.tooltip.as_deref(), Some("Full in 1d 1m"));
    }

    #[test]
    fn no_tooltip_without_time() {
        let entry = DeviceMenuEntry::new(&device(DeviceState::Discharging, 50.0, 0));
        assert_eq!(entry.tooltip, None);

        let entry = DeviceMenuEntry::new(&device(DeviceState::FullyCharged, 100.0, 600));
        assert_eq!(entry.tooltip, None);

        // under a minute
        let entry = DeviceMenuEntry::new(&device(DeviceState::Discharging, 50.0, 30));
        assert_eq!(entry.tooltip, None);
    }

    #[test]
    fn row_launches_statistics_for_device() {
        let row = DeviceMenuEntry::new(&device(DeviceState::Discharging, 45.2, 0))
            .into_row("gnome-power-statistics");

        assert_eq!(
            row,
            RowContent::Device {
                icon: "battery-good".to_string(),
                label: "Mouse".to_string(),
                percentage: "45%".to_string(),
                tooltip: None,
                command: "gnome-power-statistics --device '/org/freedesktop/UPower/devices/mouse_dev_0'"
                    .to_string(),
            }
        );
    }
}
