/// Statistics viewer, invoked with `--device <id>`
/// when a device row is clicked.
pub fn statistics_command() -> String {
    String::from("gnome-power-statistics")
}

/// Command for the "what's using power" action.
pub fn wakeups_command() -> String {
    String::from("gnome-power-statistics --device wakeups")
}

/// Command for the power settings action.
pub fn settings_command() -> String {
    String::from("gnome-control-center power")
}

/// Run synchronously before restarting the service.
pub fn kill_service_command() -> String {
    String::from("pkill -f \"^gnome-power-manager$\"")
}

/// Run asynchronously to restart the service.
pub fn start_service_command() -> String {
    String::from("gnome-power-manager")
}

pub const SERVICE_NAME: &str = "org.gnome.PowerManager";
pub const SERVICE_PATH: &str = "/org/gnome/PowerManager";

pub const WAKEUPS_LABEL: &str = "What's using power...";
pub const SETTINGS_LABEL: &str = "Power Settings";

/// Image icon sizes.
#[repr(i32)]
pub enum IconSize {
    /// 24
    Small = 24,
    /// 16
    Tiny = 16,
}
