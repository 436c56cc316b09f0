use crate::channels::MpscReceiverExt;
use crate::{spawn, try_send};
use color_eyre::{Help, Report};
use dirs::config_dir;
use gtk::gdk::Display;
use gtk::{CssProvider, gio};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Result, Watcher, recommended_watcher};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Gets the stylesheet path from `path`, `POWERLET_CSS`,
/// or `<config dir>/powerlet/style.css`, in that order.
pub fn style_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.or_else(|| env::var("POWERLET_CSS").ok().map(PathBuf::from))
        .or_else(|| config_dir().map(|dir| dir.join("powerlet").join("style.css")))
}

/// Attempts to load CSS file at the given path
/// and attach it to the given display.
///
/// Installs a file watcher and reloads CSS when
/// write changes are detected on the file.
pub fn load_css(style_path: PathBuf, display: &Display) {
    // file watcher requires absolute path
    let style_path = if style_path.is_absolute() {
        style_path
    } else {
        match env::current_dir() {
            Ok(dir) => dir.join(style_path),
            Err(err) => {
                error!("{:?}", Report::new(err).wrap_err("Failed to resolve CSS path"));
                return;
            }
        }
    };

    let provider = CssProvider::new();

    provider.connect_parsing_error(|_, section, err| {
        error!(
            "{:?}",
            Report::msg(format!("{}: {err}", section.to_str()))
                .wrap_err("Failed to load CSS")
                .suggestion("Check the CSS file for errors")
                .suggestion("GTK CSS uses a subset of the full CSS spec and many properties are not available. Ensure you are not using any unsupported property.")
        );
    });

    provider.load_from_file(&gio::File::for_path(&style_path));
    debug!("Loaded css from '{}'", style_path.display());

    gtk::style_context_add_provider_for_display(
        display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_USER,
    );

    let (tx, rx) = mpsc::channel(8);

    spawn(async move {
        let style_path2 = style_path.clone();
        let watcher = recommended_watcher(move |res: Result<Event>| match res {
            Ok(event) if matches!(event.kind, EventKind::Modify(ModifyKind::Data(_))) => {
                debug!("{event:?}");
                if event
                    .paths
                    .first()
                    .is_some_and(|p| p == &style_path2)
                {
                    try_send!(tx, style_path2.clone());
                }
            }
            Err(e) => error!("Error occurred when watching stylesheet: {:?}", e),
            _ => {}
        });

        let mut watcher = match watcher {
            Ok(watcher) => watcher,
            Err(err) => {
                error!("{:?}", Report::new(err).wrap_err("Failed to create CSS file watcher"));
                return;
            }
        };

        let Some(dir_path) = style_path.parent() else {
            return;
        };

        if let Err(err) = watcher.watch(dir_path, RecursiveMode::NonRecursive) {
            error!("{:?}", Report::new(err).wrap_err("Failed to start CSS file watcher"));
            return;
        }

        debug!("Installed CSS file watcher on '{}'", style_path.display());

        // avoid watcher from dropping
        loop {
            sleep(Duration::from_secs(1)).await;
        }
    });

    rx.recv_glib(move |path: PathBuf| {
        info!("Reloading CSS");
        provider.load_from_file(&gio::File::for_path(path));
    });
}
