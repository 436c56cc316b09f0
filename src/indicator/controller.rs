use super::Reply;
use crate::channels::AsyncSenderExt;
use crate::clients::power::PowerService;
use crate::spawn;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

/// Queries the icon, primary device and device list concurrently,
/// sending each reply to `tx` as soon as it arrives.
///
/// Replies are not sequenced. If refreshes overlap,
/// whichever reply arrives last for each query wins.
pub fn request_refresh<S: PowerService>(service: &Arc<S>, tx: &mpsc::Sender<Reply>) {
    macro_rules! spawn_query {
        ($variant:expr, $func:ident) => {{
            let service = service.clone();
            let tx = tx.clone();
            spawn(async move {
                let reply = service.$func().await;
                tx.send_expect($variant(reply)).await;
            });
        }};
    }

    spawn_query!(Reply::Icon, icon);
    spawn_query!(Reply::PrimaryDevice, primary_device);
    spawn_query!(Reply::Devices, devices);
}

/// Refreshes once immediately,
/// then again every time a change notification is received.
pub fn spawn_controller<S: PowerService>(
    service: Arc<S>,
    mut changes: broadcast::Receiver<()>,
    tx: mpsc::Sender<Reply>,
) {
    spawn(async move {
        request_refresh(&service, &tx);

        loop {
            match changes.recv().await {
                Ok(()) => {
                    debug!("Power devices changed, refreshing");
                    request_refresh(&service, &tx);
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!("Missed {count} change notifications, refreshing");
                    request_refresh(&service, &tx);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::power::{
        DeviceRecord, DeviceState, DeviceType, ServiceError, ServiceResult,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::timeout;

    #[derive(Debug, Default)]
    struct TestService {
        queries: AtomicUsize,
    }

    fn battery() -> DeviceRecord {
        DeviceRecord {
            id: "battery_BAT0".to_string(),
            kind: DeviceType::Battery,
            summary: "Laptop battery".to_string(),
            percentage: 55.0,
            state: DeviceState::Discharging,
            time_remaining: 3600,
        }
    }

    impl PowerService for TestService {
        async fn icon(&self) -> ServiceResult<String> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok("battery-good-symbolic".to_string())
        }

        async fn primary_device(&self) -> ServiceResult<DeviceRecord> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(battery())
        }

        async fn devices(&self) -> ServiceResult<Vec<DeviceRecord>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Err(ServiceError::new(
                Some("org.freedesktop.DBus.Error.NoReply"),
                "timed out",
            ))
        }
    }

    async fn recv(rx: &mut mpsc::Receiver<Reply>) -> Reply {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("reply in time")
            .expect("channel open")
    }

    async fn recv_cycle(rx: &mut mpsc::Receiver<Reply>) -> (bool, bool, bool) {
        let (mut icon, mut primary, mut devices) = (false, false, false);

        for _ in 0..3 {
            match recv(rx).await {
                Reply::Icon(reply) => {
                    assert_eq!(reply.unwrap(), "battery-good-symbolic");
                    icon = true;
                }
                Reply::PrimaryDevice(reply) => {
                    assert_eq!(reply.unwrap(), battery());
                    primary = true;
                }
                Reply::Devices(reply) => {
                    assert!(reply.is_err());
                    devices = true;
                }
            }
        }

        (icon, primary, devices)
    }

    #[tokio::test]
    async fn refresh_sends_three_replies() {
        let service = Arc::new(TestService::default());
        let (tx, mut rx) = mpsc::channel(8);

        request_refresh(&service, &tx);

        assert_eq!(recv_cycle(&mut rx).await, (true, true, true));
        assert_eq!(service.queries.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn controller_refreshes_on_change() {
        let service = Arc::new(TestService::default());
        let (changes_tx, changes_rx) = broadcast::channel(8);
        let (tx, mut rx) = mpsc::channel(8);

        spawn_controller(service.clone(), changes_rx, tx);

        // initial refresh
        assert_eq!(recv_cycle(&mut rx).await, (true, true, true));

        changes_tx.send(()).unwrap();
        assert_eq!(recv_cycle(&mut rx).await, (true, true, true));

        assert_eq!(service.queries.load(Ordering::SeqCst), 6);
    }
}
