use super::{MenuHost, RowContent, RowId, Target};
use crate::gtk_helpers::{PowerletGtkExt, icon_name};
use crate::process::{Launcher, ShellLauncher};
use gtk::prelude::*;
use gtk::{Align, Button, Image, Label, MenuButton, Orientation, Popover, Separator, Widget};
use std::collections::HashMap;
use tracing::{trace, warn};

#[derive(Debug)]
struct RowWidgets {
    root: Widget,
    label: Option<Label>,
    icon: Option<Image>,
}

/// [`MenuHost`] backed by a GTK menu button and popover.
#[derive(Debug)]
pub struct GtkMenu {
    button: MenuButton,
    image: Image,
    container: gtk::Box,
    rows: HashMap<RowId, RowWidgets>,

    icon_size: i32,
    symbolic: bool,
    launcher: ShellLauncher,
}

impl GtkMenu {
    pub fn new(icon_size: i32, symbolic: bool) -> Self {
        let image = Image::builder().pixel_size(icon_size).build();

        let container = gtk::Box::new(Orientation::Vertical, 0);
        container.add_css_class("menu");

        let popover = Popover::builder().child(&container).build();
        popover.add_css_class("popup");

        let button = MenuButton::builder()
            .child(&image)
            .popover(&popover)
            .has_frame(false)
            .build();
        button.add_css_class("indicator");

        Self {
            button,
            image,
            container,
            rows: HashMap::new(),
            icon_size,
            symbolic,
            launcher: ShellLauncher,
        }
    }

    /// The indicator button, to be placed on the bar.
    pub fn widget(&self) -> &MenuButton {
        &self.button
    }

    fn load_icon(&self, image: &Image, glyph: &str) {
        // the service may hand out a file path rather than a themed name
        if glyph.starts_with('/') {
            image.set_from_file(Some(glyph));
        } else {
            image.set_icon_name(Some(icon_name(glyph, self.symbolic).as_str()));
        }

        image.set_pixel_size(self.icon_size);
    }

    /// Creates a flat button which closes the menu and runs `command` when clicked.
    fn activatable(&self, child: &impl IsA<Widget>, command: String) -> Button {
        let button = Button::builder().child(child).has_frame(false).build();

        let menu_button = self.button.clone();
        let launcher = self.launcher;
        button.connect_clicked(move |_| {
            menu_button.popdown();
            launcher.spawn_command(&command);
        });

        button
    }

    fn build_row(&self, content: RowContent) -> RowWidgets {
        match content {
            RowContent::Text { label } => {
                let label = Label::builder().label(label).halign(Align::Start).build();
                label.add_css_class("battery");

                RowWidgets {
                    root: label.clone().upcast(),
                    label: Some(label),
                    icon: None,
                }
            }
            RowContent::Separator => {
                let separator = Separator::new(Orientation::Horizontal);
                separator.add_css_class("separator");

                RowWidgets {
                    root: separator.upcast(),
                    label: None,
                    icon: None,
                }
            }
            RowContent::Action { label, command } => {
                let label = Label::builder().label(label).halign(Align::Start).build();
                let button = self.activatable(&label, command);
                button.add_css_class("action");

                RowWidgets {
                    root: button.upcast(),
                    label: Some(label),
                    icon: None,
                }
            }
            RowContent::Device {
                icon,
                label,
                percentage,
                tooltip,
                command,
            } => {
                let container = gtk::Box::new(Orientation::Horizontal, 6);

                let image = Image::new();
                image.add_css_class("icon");
                self.load_icon(&image, &icon);

                let label = Label::builder()
                    .label(label)
                    .halign(Align::Start)
                    .hexpand(true)
                    .build();
                label.add_css_class("label");

                let percentage = Label::builder().label(percentage).halign(Align::End).build();
                percentage.add_css_class("percentage");

                container.append(&image);
                container.append(&label);
                container.append(&percentage);

                let button = self.activatable(&container, command);
                button.add_css_classes(&["device", "action"]);
                button.set_tooltip_text(tooltip.as_deref());

                RowWidgets {
                    root: button.upcast(),
                    label: Some(label),
                    icon: Some(image),
                }
            }
        }
    }
}

impl MenuHost for GtkMenu {
    fn create_row(&mut self, content: RowContent) -> RowId {
        let id = RowId::next();
        trace!("Creating row {id:?}: {content:?}");

        let widgets = self.build_row(content);
        self.rows.insert(id, widgets);

        id
    }

    fn insert_row_at(&mut self, row: RowId, position: usize) {
        let Some(widgets) = self.rows.get(&row) else {
            warn!("Attempted to insert unknown row {row:?}");
            return;
        };

        let widget = &widgets.root;
        if widget.parent().is_some() {
            self.container.remove(widget);
        }

        if position == 0 {
            self.container.prepend(widget);
        } else {
            match self.container.nth_child(position - 1) {
                Some(sibling) => self.container.insert_child_after(widget, Some(&sibling)),
                None => self.container.append(widget),
            }
        }
    }

    fn remove_row(&mut self, row: RowId) {
        let Some(widgets) = self.rows.remove(&row) else {
            return;
        };

        if widgets.root.parent().is_some() {
            self.container.remove(&widgets.root);
        }
    }

    fn set_icon(&mut self, target: Target, icon: &str) {
        match target {
            Target::Indicator => self.load_icon(&self.image, icon),
            Target::Row(row) => {
                if let Some(image) = self.rows.get(&row).and_then(|w| w.icon.as_ref()) {
                    self.load_icon(image, icon);
                }
            }
        }
    }

    fn set_label(&mut self, row: RowId, label: &str) {
        if let Some(widget) = self.rows.get(&row).and_then(|w| w.label.as_ref()) {
            widget.set_label(label);
        }
    }

    fn set_visible(&mut self, target: Target, visible: bool) {
        match target {
            Target::Indicator => self.button.set_visible(visible),
            Target::Row(row) => {
                if let Some(widgets) = self.rows.get(&row) {
                    widgets.root.set_visible(visible);
                }
            }
        }
    }

    fn close_menu(&mut self) {
        self.button.popdown();
    }
}
