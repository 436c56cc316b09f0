#![doc = include_str!("../README.md")]

use std::cell::Cell;
use std::future::Future;
use std::path::PathBuf;
use std::process::exit;
use std::rc::Rc;
use std::sync::{Arc, LazyLock, mpsc};

use cfg_if::cfg_if;
#[cfg(feature = "cli")]
use clap::Parser;
use color_eyre::Report;
use gtk::Application;
use gtk::gdk::Display;
use gtk::prelude::*;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;

use crate::bar::create_bar;
use crate::channels::{MpscReceiverExt, SyncSenderExt};
use crate::clients::power::Client;
use crate::config::Config;
use crate::error::ExitCode;
use crate::indicator::{StatusIndicator, spawn_controller};
use crate::menu::GtkMenu;
use crate::process::ShellLauncher;
use crate::style::{load_css, style_path};

mod bar;
mod channels;
#[cfg(feature = "cli")]
mod cli;
mod clients;
mod config;
mod error;
mod gtk_helpers;
mod indicator;
mod logging;
mod macros;
mod menu;
mod process;
#[cfg(feature = "cli")]
mod status;
mod style;

const GTK_APP_ID: &str = "dev.powerlet.Powerlet";
const VERSION: &str = env!("CARGO_PKG_VERSION");

static RUNTIME: LazyLock<Arc<Runtime>> = LazyLock::new(|| Arc::new(create_runtime()));

fn main() {
    cfg_if! {
        if #[cfg(feature = "cli")] {
            run_with_args();
        } else {
            let _guard = install_logging(false);
            start_powerlet(None, None);
        }
    }
}

#[cfg(feature = "cli")]
fn run_with_args() {
    let args = cli::Args::parse();
    let guard = install_logging(args.debug);

    match args.command {
        Some(cli::Command::Status { format }) => {
            let config = Config::load(args.config);
            let code = run_status(&config, format);

            // flush logs before exiting
            drop(guard);
            exit(code);
        }
        None => start_powerlet(args.config, args.style),
    }
}

/// Queries the service once and prints the result.
/// Returns the process exit code.
#[cfg(feature = "cli")]
fn run_status(config: &Config, format: cli::Format) -> i32 {
    let status = await_sync(async {
        let client = Client::new(&config.service).await?;
        Ok::<_, Report>(status::query(&client).await)
    });

    match status {
        Ok(status) => {
            println!("{}", status::render(&status, format));

            if status.is_unavailable() {
                ExitCode::ServiceUnavailable as i32
            } else {
                0
            }
        }
        Err(err) => {
            error!("{err:?}");
            ExitCode::ServiceUnavailable as i32
        }
    }
}

fn install_logging(debug: bool) -> Option<WorkerGuard> {
    match logging::install_logging(debug) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Failed to install logging: {err:?}");
            None
        }
    }
}

fn start_powerlet(config_path: Option<PathBuf>, style_override: Option<PathBuf>) {
    info!("powerlet version {}", VERSION);
    info!("Starting application");

    let app = Application::builder().application_id(GTK_APP_ID).build();

    let running = Rc::new(Cell::new(false));

    app.connect_activate(move |app| {
        if running.get() {
            info!("powerlet already running, returning");
            return;
        }

        running.set(true);

        let display = Display::default().map_or_else(
            || {
                let report = Report::msg("Failed to get default GTK display");
                error!("{:?}", report);
                exit(ExitCode::GtkDisplay as i32)
            },
            |display| display,
        );

        let config = Config::load(config_path.clone());
        load_interface(app, &config);

        match style_path(style_override.clone()) {
            Some(path) if path.exists() => load_css(path, &display),
            Some(path) => debug!("No stylesheet found at '{}'", path.display()),
            None => error!("{:?}", Report::msg("Failed to locate user config dir")),
        }

        let (tx, rx) = mpsc::channel();

        runtime().spawn_blocking(move || {
            if rx.recv().is_ok() {
                info!("Shutting down");
                exit(0);
            }
        });

        if let Err(err) = ctrlc::set_handler(move || tx.send_expect(())) {
            error!("{:?}", Report::new(err).wrap_err("Error setting Ctrl-C handler"));
        }
    });

    // Ignore CLI args
    // these are handled by clap before GTK starts
    app.run_with_args(&Vec::<&str>::new());
}

/// Connects to the power manager, creates the indicator window,
/// and starts the refresh controller.
fn load_interface(app: &Application, config: &Config) {
    let client = await_sync(Client::new(&config.service)).unwrap_or_else(|err| {
        error!("{err:?}");
        exit(ExitCode::ServiceUnavailable as i32)
    });

    let changes = client.subscribe();
    let client = Arc::new(client);

    let menu = GtkMenu::new(config.icon_size, config.symbolic_icons);
    if let Err(err) = create_bar(app, config, menu.widget()) {
        error!("{:?}", err);
        exit(ExitCode::CreateBar as i32);
    }
    debug!("Created bar");

    let indicator = rc_mut!(StatusIndicator::new(
        menu,
        ShellLauncher,
        &config.commands,
        &config.labels
    ));

    let (tx, rx) = tokio::sync::mpsc::channel(32);
    spawn_controller(client, changes, tx);

    rx.recv_glib(move |reply| indicator.borrow_mut().apply(reply));
}

fn create_runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .enable_io()
        .build()
        .expect("tokio runtime creation")
}

pub fn runtime() -> Arc<Runtime> {
    RUNTIME.clone()
}

/// Spawns a task on the global tokio runtime.
///
/// This can be called from any thread,
/// including the GTK main thread.
pub fn spawn<F>(f: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    RUNTIME.spawn(f)
}

/// Blocks on a `Future` until it resolves.
///
/// Must not be called from inside the runtime.
/// Use sparingly! Prefer async functions wherever possible.
pub fn await_sync<F: Future>(f: F) -> F::Output {
    RUNTIME.block_on(f)
}
