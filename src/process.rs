use crate::spawn;
use color_eyre::eyre::WrapErr;
use color_eyre::{Help, Report, Result};
use tracing::{debug, error, instrument, warn};

/// Runs external commands on behalf of the indicator.
pub trait Launcher {
    /// Launches `command` in the background without waiting for it.
    /// Failures are logged, never returned.
    fn spawn_command(&self, command: &str);

    /// Runs `command` to completion, blocking the calling thread.
    ///
    /// If the command exits with status 0, its trimmed `stdout` is returned.
    /// Otherwise an `Err` containing its `stderr` is returned.
    fn run_command(&self, command: &str) -> Result<String>;
}

/// Runs commands through `sh -c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellLauncher;

impl Launcher for ShellLauncher {
    fn spawn_command(&self, command: &str) {
        let command = command.to_string();

        spawn(async move {
            debug!("Launching '{command}'");

            let child = tokio::process::Command::new("sh")
                .arg("-c")
                .arg(&command)
                .spawn();

            match child {
                Ok(mut child) => match child.wait().await {
                    Ok(status) if !status.success() => {
                        warn!("'{command}' exited with {status}");
                    }
                    Ok(_) => {}
                    Err(err) => error!("{:?}", Report::new(err).wrap_err("Failed to wait on child")),
                },
                Err(err) => error!(
                    "{:?}",
                    Report::new(err)
                        .wrap_err(format!("Failed to launch '{command}'"))
                        .suggestion("Check the command is installed and on your PATH")
                ),
            }
        });
    }

    #[instrument(skip(self))]
    fn run_command(&self, command: &str) -> Result<String> {
        let output = std::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .wrap_err("Failed to get command output")?;

        if output.status.success() {
            let stdout = String::from_utf8(output.stdout)
                .map(|output| output.trim().to_string())
                .wrap_err("Command stdout not valid UTF-8")?;

            Ok(stdout)
        } else {
            let stderr = String::from_utf8(output.stderr)
                .map(|output| output.trim().to_string())
                .wrap_err("Command stderr not valid UTF-8")?;

            Err(Report::msg(stderr).wrap_err("Command returned non-zero error code"))
        }
    }
}

/// Wraps `value` in single quotes so that `sh` treats it as one word.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_plain() {
        assert_eq!(
            shell_quote("/org/freedesktop/UPower/devices/battery_BAT0"),
            "'/org/freedesktop/UPower/devices/battery_BAT0'"
        );
    }

    #[test]
    fn quote_embedded_quote() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn run_captures_stdout() {
        let out = ShellLauncher.run_command("echo '  hello  '").unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn run_quoted_roundtrip() {
        let out = ShellLauncher
            .run_command(&format!("printf %s {}", shell_quote("a b'c")))
            .unwrap();
        assert_eq!(out, "a b'c");
    }

    #[test]
    fn run_non_zero_is_err() {
        assert!(ShellLauncher.run_command("echo oops >&2; exit 3").is_err());
    }
}
