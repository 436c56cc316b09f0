use crate::cli::Format;
use crate::clients::power::{DeviceRecord, PowerService};
use crate::indicator::entry::percentage_label;
use crate::indicator::other_devices;
use serde::Serialize;
use std::fmt::Write;
use tracing::error;

/// A one-off snapshot of what the indicator would show.
#[derive(Debug, Default, Serialize)]
pub struct Status {
    pub icon: Option<String>,
    pub primary_device: Option<DeviceRecord>,
    /// Every device except the primary one, in service order.
    pub devices: Vec<DeviceRecord>,
    pub errors: Vec<String>,
}

impl Status {
    /// Whether every query failed.
    pub fn is_unavailable(&self) -> bool {
        self.icon.is_none() && self.primary_device.is_none() && self.errors.len() == 3
    }
}

/// Runs each query once, concurrently.
pub async fn query(service: &impl PowerService) -> Status {
    let (icon, primary, devices) =
        tokio::join!(service.icon(), service.primary_device(), service.devices());

    let mut status = Status::default();

    match icon {
        Ok(icon) => status.icon = Some(icon),
        Err(err) => status.errors.push(format!("icon: {err}")),
    }

    match primary {
        Ok(device) => status.primary_device = Some(device),
        Err(err) => status.errors.push(format!("primary device: {err}")),
    }

    match devices {
        Ok(devices) => {
            let primary_id = status.primary_device.as_ref().map(|d| d.id.as_str());
            status.devices = other_devices(devices, primary_id);
        }
        Err(err) => status.errors.push(format!("devices: {err}")),
    }

    status
}

pub fn render(status: &Status, format: Format) -> String {
    match format {
        Format::Plain => render_plain(status),
        Format::Json => serde_json::to_string_pretty(status).unwrap_or_else(|err| {
            error!("Failed to serialize status: {err}");
            String::new()
        }),
    }
}

fn render_plain(status: &Status) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "icon: {}", status.icon.as_deref().unwrap_or("-"));

    match &status.primary_device {
        Some(device) => {
            let _ = writeln!(out, "primary: {}", describe(device));
        }
        None => {
            let _ = writeln!(out, "primary: -");
        }
    }

    if !status.devices.is_empty() {
        let _ = writeln!(out, "devices:");
        for device in &status.devices {
            let _ = writeln!(out, "  {}", describe(device));
        }
    }

    for err in &status.errors {
        let _ = writeln!(out, "error: {err}");
    }

    out
}

fn describe(device: &DeviceRecord) -> String {
    format!(
        "{} ({}, {}, {})",
        device.summary,
        device.kind,
        percentage_label(device.percentage),
        device.state
    )
}
