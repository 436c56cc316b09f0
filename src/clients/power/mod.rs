mod dbus;

use crate::channels::SyncSenderExt;
use crate::config::{BusType, ServiceConfig};
use crate::spawn;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use dbus::PowerManagerProxy;
use futures_lite::StreamExt;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::future::Future;
use tokio::sync::broadcast;
use tracing::{debug, error, info};
use zbus::proxy::CacheProperties;

pub use dbus::{DeviceState, DeviceTuple, DeviceType};

/// A single power device as reported by the power manager.
///
/// Records are fetched fresh on every query and never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DeviceType,
    pub summary: String,
    pub percentage: f64,
    pub state: DeviceState,
    /// Seconds until full or empty, depending on `state`.
    /// Zero when unknown.
    pub time_remaining: u64,
}

impl From<DeviceTuple> for DeviceRecord {
    fn from((id, kind, summary, percentage, state, time): DeviceTuple) -> Self {
        Self {
            id,
            kind: kind.into(),
            summary,
            percentage,
            state: state.into(),
            time_remaining: time,
        }
    }
}

/// An error returned by a query against the power manager.
///
/// D-Bus method errors keep their error name
/// so that callers can react to specific failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub name: Option<String>,
    pub message: String,
}

impl ServiceError {
    pub fn new(name: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            name: name.map(ToString::to_string),
            message: message.into(),
        }
    }

    /// Checks whether the error name, or failing that the message,
    /// refers to the given D-Bus error name.
    pub fn is(&self, error_name: &str) -> bool {
        self.name.as_deref() == Some(error_name) || self.message.contains(error_name)
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<zbus::Error> for ServiceError {
    fn from(err: zbus::Error) -> Self {
        match err {
            zbus::Error::MethodError(name, detail, _) => Self {
                name: Some(name.to_string()),
                message: detail.unwrap_or_default(),
            },
            err => Self {
                name: None,
                message: err.to_string(),
            },
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// The request/reply contract of the power manager.
pub trait PowerService: Send + Sync + 'static {
    /// Gets the icon glyph summarising all devices.
    /// Empty when there is no relevant device.
    fn icon(&self) -> impl Future<Output = ServiceResult<String>> + Send;

    /// Gets the device the service summarises in the main menu row.
    fn primary_device(&self) -> impl Future<Output = ServiceResult<DeviceRecord>> + Send;

    /// Gets every device known to the service, in service order.
    fn devices(&self) -> impl Future<Output = ServiceResult<Vec<DeviceRecord>>> + Send;
}

#[derive(Debug)]
pub struct Client {
    proxy: PowerManagerProxy<'static>,
    tx: broadcast::Sender<()>,
    _rx: broadcast::Receiver<()>,
}

impl Client {
    /// Connects to the configured bus
    /// and starts listening for `Changed` signals.
    ///
    /// The service itself does not need to be running yet.
    pub async fn new(config: &ServiceConfig) -> Result<Self> {
        let dbus = match config.bus {
            BusType::Session => Box::pin(zbus::Connection::session()).await,
            BusType::System => Box::pin(zbus::Connection::system()).await,
        }
        .wrap_err("Failed to connect to D-Bus")?;

        let proxy = PowerManagerProxy::builder(&dbus)
            .destination(config.name.clone())?
            .path(config.path.clone())?
            .cache_properties(CacheProperties::No)
            .build()
            .await
            .wrap_err("Failed to create power manager proxy")?;

        info!(
            "Connected to '{}' at '{}' on the {} bus",
            config.name, config.path, config.bus
        );

        let (tx, rx) = broadcast::channel(8);

        let mut stream = proxy.receive_changed().await?;

        {
            let tx = tx.clone();

            spawn(async move {
                while stream.next().await.is_some() {
                    debug!("Received Changed signal");
                    tx.send_expect(());
                }

                error!("Power manager signal stream ended");
            });
        }

        Ok(Self { proxy, tx, _rx: rx })
    }

    /// Subscribes to change notifications.
    /// Each message means every query should be repeated.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

impl PowerService for Client {
    async fn icon(&self) -> ServiceResult<String> {
        Ok(self.proxy.icon().await?)
    }

    async fn primary_device(&self) -> ServiceResult<DeviceRecord> {
        Ok(self.proxy.get_primary_device().await?.into())
    }

    async fn devices(&self) -> ServiceResult<Vec<DeviceRecord>> {
        Ok(self
            .proxy
            .get_devices()
            .await?
            .into_iter()
            .map(DeviceRecord::from)
            .collect())
    }
}
