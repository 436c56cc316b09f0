use crate::clients::power::ServiceError;
use crate::config::CommandsConfig;
use crate::process::Launcher;
use tracing::{debug, error, warn};

/// Errors which mean the running service speaks a different interface
/// than expected, usually after an upgrade.
pub const RECOVERABLE_ERRORS: [&str; 2] = [
    "org.freedesktop.DBus.Error.UnknownMethod",
    "org.freedesktop.DBus.Error.InvalidArgs",
];

/// Restarts the power manager the first time it returns a recoverable error.
///
/// This happens at most once per instance.
/// Every other error is ignored.
#[derive(Debug)]
pub struct ErrorRecovery<L> {
    launcher: L,
    kill_command: String,
    start_command: String,
    attempted: bool,
}

impl<L: Launcher> ErrorRecovery<L> {
    pub fn new(launcher: L, commands: &CommandsConfig) -> Self {
        Self {
            launcher,
            kill_command: commands.kill_service.clone(),
            start_command: commands.start_service.clone(),
            attempted: false,
        }
    }

    /// Checks `error`, restarting the service if it is recoverable
    /// and no restart has been attempted yet.
    ///
    /// Returns whether a restart was triggered.
    pub fn check(&mut self, error: &ServiceError) -> bool {
        if self.attempted || !is_recoverable(error) {
            debug!("Ignoring power manager error: {error}");
            return false;
        }

        warn!("Power manager returned '{error}', restarting it");

        // the old instance must be gone before the new one claims the bus name
        if let Err(err) = self.launcher.run_command(&self.kill_command) {
            error!("{:?}", err.wrap_err("Failed to stop power manager"));
        }

        self.launcher.spawn_command(&self.start_command);
        self.attempted = true;

        true
    }

    pub fn attempted(&self) -> bool {
        self.attempted
    }
}

pub fn is_recoverable(error: &ServiceError) -> bool {
    RECOVERABLE_ERRORS.iter().any(|name| error.is(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::test_launcher::{Call, RecordingLauncher};

    fn unknown_method() -> ServiceError {
        ServiceError::new(
            Some("org.freedesktop.DBus.Error.UnknownMethod"),
            "No such method 'GetPrimaryDevice'",
        )
    }

    fn recovery(launcher: &RecordingLauncher) -> ErrorRecovery<RecordingLauncher> {
        ErrorRecovery::new(launcher.clone(), &CommandsConfig::default())
    }

    #[test]
    fn restarts_on_unknown_method() {
        let launcher = RecordingLauncher::default();
        let mut recovery = recovery(&launcher);

        assert!(recovery.check(&unknown_method()));
        assert!(recovery.attempted());
        assert_eq!(
            launcher.calls(),
            vec![
                Call::Run("pkill -f \"^gnome-power-manager$\"".to_string()),
                Call::Spawn("gnome-power-manager".to_string()),
            ]
        );
    }

    #[test]
    fn restarts_on_invalid_args_in_message() {
        let launcher = RecordingLauncher::default();
        let mut recovery = recovery(&launcher);

        let err = ServiceError::new(
            None,
            "org.freedesktop.DBus.Error.InvalidArgs: Type of message, '(s)', does not match",
        );

        assert!(recovery.check(&err));
        assert_eq!(launcher.calls().len(), 2);
    }

    #[test]
    fn restarts_only_once() {
        let launcher = RecordingLauncher::default();
        let mut recovery = recovery(&launcher);

        assert!(recovery.check(&unknown_method()));
        assert!(!recovery.check(&unknown_method()));
        assert!(!recovery.check(&unknown_method()));

        assert_eq!(launcher.calls().len(), 2);
    }

    #[test]
    fn ignores_other_errors() {
        let launcher = RecordingLauncher::default();
        let mut recovery = recovery(&launcher);

        for err in [
            ServiceError::new(Some("org.freedesktop.DBus.Error.NoReply"), "timed out"),
            ServiceError::new(
                Some("org.freedesktop.DBus.Error.ServiceUnknown"),
                "The name org.gnome.PowerManager was not provided",
            ),
            ServiceError::new(None, "invalid signature"),
        ] {
            assert!(!recovery.check(&err));
        }

        assert!(!recovery.attempted());
        assert!(launcher.calls().is_empty());
    }

    #[test]
    fn failed_kill_still_restarts() {
        let launcher = RecordingLauncher {
            fail_runs: true,
            ..RecordingLauncher::default()
        };
        let mut recovery = recovery(&launcher);

        assert!(recovery.check(&unknown_method()));
        assert!(recovery.attempted());
        assert_eq!(
            launcher.calls().last(),
            Some(&Call::Spawn("gnome-power-manager".to_string()))
        );
    }

    #[test]
    fn custom_commands() {
        let launcher = RecordingLauncher::default();
        let commands = CommandsConfig {
            kill_service: "systemctl --user stop gpm".to_string(),
            start_service: "systemctl --user start gpm".to_string(),
            ..CommandsConfig::default()
        };
        let mut recovery = ErrorRecovery::new(launcher.clone(), &commands);

        recovery.check(&unknown_method());

        assert_eq!(
            launcher.calls(),
            vec![
                Call::Run("systemctl --user stop gpm".to_string()),
                Call::Spawn("systemctl --user start gpm".to_string()),
            ]
        );
    }
}
