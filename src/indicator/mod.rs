mod controller;
pub mod entry;
mod recovery;

use crate::clients::power::{DeviceRecord, DeviceType, ServiceError, ServiceResult};
use crate::config::{CommandsConfig, LabelsConfig};
use crate::menu::{MenuHost, RowContent, RowId, Target};
use crate::process::Launcher;
use entry::{DeviceMenuEntry, MISSING_ICON};
use tracing::{debug, trace};

pub use controller::spawn_controller;
use recovery::ErrorRecovery;

/// Menu position of the first non-primary device row.
pub const OTHER_DEVICE_POSITION: usize = 2;

/// A reply to one of the three queries made on each refresh.
#[derive(Debug, Clone)]
pub enum Reply {
    Icon(ServiceResult<String>),
    PrimaryDevice(ServiceResult<DeviceRecord>),
    Devices(ServiceResult<Vec<DeviceRecord>>),
}

/// The service state the indicator is currently showing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorState {
    pub icon: Option<String>,
    pub primary_device_id: Option<String>,
    pub has_primary: bool,
    /// Devices shown below the primary device.
    /// Never contains AC adapters or the primary device.
    pub other_devices: Vec<DeviceRecord>,
}

/// Projects the power manager's state onto a menu.
///
/// Each of the three query replies only writes its own part of the state,
/// so replies may arrive in any order.
#[derive(Debug)]
pub struct StatusIndicator<M, L> {
    menu: M,
    recovery: ErrorRecovery<L>,
    statistics_command: String,

    battery_row: RowId,
    device_separator: RowId,
    device_rows: Vec<RowId>,

    state: IndicatorState,
}

impl<M: MenuHost, L: Launcher> StatusIndicator<M, L> {
    /// Builds the fixed part of the menu:
    ///
    /// ```text
    /// 0  primary battery
    /// 1  separator
    /// 2  <other devices>
    /// .  separator
    /// .  what's using power
    /// .  power settings
    /// ```
    pub fn new(
        mut menu: M,
        launcher: L,
        commands: &CommandsConfig,
        labels: &LabelsConfig,
    ) -> Self {
        menu.set_icon(Target::Indicator, MISSING_ICON);

        let battery_row = menu.create_row(RowContent::Text {
            label: String::new(),
        });
        let device_separator = menu.create_row(RowContent::Separator);
        let actions_separator = menu.create_row(RowContent::Separator);
        let wakeups = menu.create_row(RowContent::Action {
            label: labels.wakeups.clone(),
            command: commands.wakeups.clone(),
        });
        let settings = menu.create_row(RowContent::Action {
            label: labels.settings.clone(),
            command: commands.settings.clone(),
        });

        for (position, row) in [
            battery_row,
            device_separator,
            actions_separator,
            wakeups,
            settings,
        ]
        .into_iter()
        .enumerate()
        {
            menu.insert_row_at(row, position);
        }

        menu.set_visible(Target::Row(battery_row), false);
        menu.set_visible(Target::Row(device_separator), false);

        Self {
            menu,
            recovery: ErrorRecovery::new(launcher, commands),
            statistics_command: commands.statistics.clone(),
            battery_row,
            device_separator,
            device_rows: vec![],
            state: IndicatorState::default(),
        }
    }

    pub fn state(&self) -> &IndicatorState {
        &self.state
    }

    pub fn menu(&self) -> &M {
        &self.menu
    }

    pub fn restart_attempted(&self) -> bool {
        self.recovery.attempted()
    }

    pub fn apply(&mut self, reply: Reply) {
        trace!("Applying reply: {reply:?}");

        match reply {
            Reply::Icon(reply) => self.refresh_icon(reply),
            Reply::PrimaryDevice(reply) => self.refresh_primary_device(reply),
            Reply::Devices(reply) => self.refresh_other_devices(reply),
        }
    }

    /// Shows the indicator with the service's icon,
    /// or hides it if there is no icon to show.
    pub fn refresh_icon(&mut self, reply: ServiceResult<String>) {
        match reply {
            Ok(icon) if !icon.is_empty() => {
                self.menu.set_icon(Target::Indicator, &icon);
                self.menu.set_visible(Target::Indicator, true);
                self.state.icon = Some(icon);
            }
            reply => {
                if let Err(err) = reply {
                    self.handle_error("icon", &err);
                } else {
                    debug!("No power devices to show, hiding indicator");
                }

                self.menu.close_menu();
                self.menu.set_visible(Target::Indicator, false);
                self.state.icon = None;
            }
        }
    }

    /// Updates the primary battery row.
    /// Only batteries are shown there.
    pub fn refresh_primary_device(&mut self, reply: ServiceResult<DeviceRecord>) {
        match reply {
            Ok(device) => {
                self.state.has_primary = device.kind == DeviceType::Battery;

                if self.state.has_primary {
                    self.menu.set_label(self.battery_row, &device.summary);
                }

                // the device list may have been rendered against an older primary
                self.remove_other_device(&device.id);
                self.state.primary_device_id = Some(device.id);
            }
            Err(err) => {
                self.handle_error("primary device", &err);
                self.state.has_primary = false;
                self.state.primary_device_id = None;
            }
        }

        self.menu
            .set_visible(Target::Row(self.battery_row), self.state.has_primary);
        self.update_separator();
    }

    /// Rebuilds the rows for every device other than the primary.
    pub fn refresh_other_devices(&mut self, reply: ServiceResult<Vec<DeviceRecord>>) {
        for row in self.device_rows.drain(..) {
            self.menu.remove_row(row);
        }
        self.state.other_devices.clear();

        match reply {
            Ok(devices) => {
                let devices = other_devices(devices, self.state.primary_device_id.as_deref());

                for (index, device) in devices.into_iter().enumerate() {
                    let row = self.menu.create_row(
                        DeviceMenuEntry::new(&device).into_row(&self.statistics_command),
                    );
                    self.menu.insert_row_at(row, OTHER_DEVICE_POSITION + index);

                    self.device_rows.push(row);
                    self.state.other_devices.push(device);
                }
            }
            Err(err) => self.handle_error("devices", &err),
        }

        self.update_separator();
    }

    fn remove_other_device(&mut self, id: &str) {
        if let Some(index) = self
            .state
            .other_devices
            .iter()
            .position(|device| device.id == id)
        {
            self.state.other_devices.remove(index);
            let row = self.device_rows.remove(index);
            self.menu.remove_row(row);
        }
    }

    fn update_separator(&mut self) {
        let visible = self.state.has_primary && !self.device_rows.is_empty();
        self.menu
            .set_visible(Target::Row(self.device_separator), visible);
    }

    fn handle_error(&mut self, query: &str, err: &ServiceError) {
        debug!("Failed to query {query}: {err}");
        self.recovery.check(err);
    }
}

/// Filters `devices` down to those shown below the primary device,
/// keeping their order.
pub fn other_devices(devices: Vec<DeviceRecord>, primary_id: Option<&str>) -> Vec<DeviceRecord> {
    devices
        .into_iter()
        .filter(|device| {
            device.kind != DeviceType::AcPower && Some(device.id.as_str()) != primary_id
        })
        .collect()
}
