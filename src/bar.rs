use crate::config::{Alignment, BarPosition, Config, MarginConfig};
use color_eyre::{Help, Report, Result};
use gtk::prelude::*;
use gtk::{Application, ApplicationWindow, Orientation, Widget};
use gtk_layer_shell::LayerShell;
use tracing::debug;

/// Creates the layer-shell window hosting the indicator
/// and presents it.
pub fn create_bar(
    app: &Application,
    config: &Config,
    indicator: &impl IsA<Widget>,
) -> Result<ApplicationWindow> {
    if !gtk_layer_shell::is_supported() {
        return Err(Report::msg("The compositor does not support the layer shell protocol")
            .suggestion("Run powerlet under a wlroots-based compositor, KDE or niri"));
    }

    let win = ApplicationWindow::builder().application(app).build();
    win.set_widget_name("powerlet");

    let content = gtk::Box::new(Orientation::Horizontal, 0);
    content.add_css_class("container");
    content.append(indicator);
    win.set_child(Some(&content));

    setup_layer_shell(&win, config.position, config.alignment, config.margin);

    {
        let app = app.clone();
        win.connect_destroy(move |_| {
            debug!("Window destroyed, quitting");
            app.quit();
        });
    }

    win.present();
    Ok(win)
}

/// Sets up GTK layer shell for a provided application window.
fn setup_layer_shell(
    win: &ApplicationWindow,
    position: BarPosition,
    alignment: Alignment,
    margin: MarginConfig,
) {
    use gtk_layer_shell::{Edge, Layer};

    win.init_layer_shell();
    win.set_layer(Layer::Top);
    win.set_namespace(Some(env!("CARGO_PKG_NAME")));

    win.set_margin(Edge::Top, margin.top);
    win.set_margin(Edge::Bottom, margin.bottom);
    win.set_margin(Edge::Left, margin.left);
    win.set_margin(Edge::Right, margin.right);

    let (top, bottom, left, right) = anchors(position, alignment);

    win.set_anchor(Edge::Top, top);
    win.set_anchor(Edge::Bottom, bottom);
    win.set_anchor(Edge::Left, left);
    win.set_anchor(Edge::Right, right);
}

/// Gets which edges to anchor to, as `(top, bottom, left, right)`.
/// Centered windows anchor to neither horizontal edge.
const fn anchors(position: BarPosition, alignment: Alignment) -> (bool, bool, bool, bool) {
    (
        matches!(position, BarPosition::Top),
        matches!(position, BarPosition::Bottom),
        matches!(alignment, Alignment::Start),
        matches!(alignment, Alignment::End),
    )
}
