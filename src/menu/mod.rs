//! The menu surface the indicator draws onto.
//!
//! The indicator only talks to [`MenuHost`],
//! so it does not need to know which toolkit renders the rows.

mod popover;

use std::sync::atomic::{AtomicUsize, Ordering};

pub use popover::GtkMenu;

static COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Opaque handle to a row created by a [`MenuHost`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RowId(usize);

impl RowId {
    /// Gets a new row id, unique for the lifetime of the program.
    pub fn next() -> Self {
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Something whose icon or visibility can be changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Target {
    /// The indicator button on the bar.
    Indicator,
    Row(RowId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowContent {
    /// Plain, non-interactive text.
    Text { label: String },
    Separator,
    /// Text which runs `command` when activated.
    Action { label: String, command: String },
    /// Icon, label and right-aligned percentage,
    /// running `command` when activated.
    Device {
        icon: String,
        label: String,
        percentage: String,
        tooltip: Option<String>,
        command: String,
    },
}

pub trait MenuHost {
    /// Creates a row without placing it in the menu.
    fn create_row(&mut self, content: RowContent) -> RowId;

    /// Places `row` at `position` in the menu,
    /// shifting the row currently there and all after it down by one.
    ///
    /// Positions past the end append.
    fn insert_row_at(&mut self, row: RowId, position: usize);

    /// Removes `row` from the menu and destroys it.
    fn remove_row(&mut self, row: RowId);

    fn set_icon(&mut self, target: Target, icon: &str);

    fn set_label(&mut self, row: RowId, label: &str);

    fn set_visible(&mut self, target: Target, visible: bool);

    /// Closes the menu if it is open.
    fn close_menu(&mut self);
}

#[cfg(test)]
pub mod test_menu {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, Clone)]
    pub struct Row {
        pub content: RowContent,
        pub label: Option<String>,
        pub icon: Option<String>,
        pub visible: bool,
    }

    /// In-memory [`MenuHost`] which records everything drawn onto it.
    #[derive(Debug)]
    pub struct TestMenu {
        pub order: Vec<RowId>,
        pub rows: HashMap<RowId, Row>,
        pub icon: Option<String>,
        pub visible: bool,
        pub open: bool,
        pub close_count: usize,
    }

    impl Default for TestMenu {
        fn default() -> Self {
            Self {
                order: vec![],
                rows: HashMap::new(),
                icon: None,
                visible: true,
                open: false,
                close_count: 0,
            }
        }
    }

    impl TestMenu {
        pub fn row(&self, id: RowId) -> &Row {
            &self.rows[&id]
        }

        /// Gets the content of every placed row, in menu order.
        pub fn contents(&self) -> Vec<&RowContent> {
            self.order.iter().map(|id| &self.rows[id].content).collect()
        }

        /// Gets the label of every placed device row, in menu order.
        pub fn device_labels(&self) -> Vec<&str> {
            self.contents()
                .into_iter()
                .filter_map(|content| match content {
                    RowContent::Device { label, .. } => Some(label.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl MenuHost for TestMenu {
        fn create_row(&mut self, content: RowContent) -> RowId {
            let id = RowId::next();
            self.rows.insert(
                id,
                Row {
                    content,
                    label: None,
                    icon: None,
                    visible: true,
                },
            );
            id
        }

        fn insert_row_at(&mut self, row: RowId, position: usize) {
            assert!(self.rows.contains_key(&row), "row does not exist");
            self.order.retain(|id| *id != row);
            let position = position.min(self.order.len());
            self.order.insert(position, row);
        }

        fn remove_row(&mut self, row: RowId) {
            self.order.retain(|id| *id != row);
            self.rows.remove(&row);
        }

        fn set_icon(&mut self, target: Target, icon: &str) {
            match target {
                Target::Indicator => self.icon = Some(icon.to_string()),
                Target::Row(id) => {
                    if let Some(row) = self.rows.get_mut(&id) {
                        row.icon = Some(icon.to_string());
                    }
                }
            }
        }

        fn set_label(&mut self, row: RowId, label: &str) {
            if let Some(row) = self.rows.get_mut(&row) {
                row.label = Some(label.to_string());
            }
        }

        fn set_visible(&mut self, target: Target, visible: bool) {
            match target {
                Target::Indicator => self.visible = visible,
                Target::Row(id) => {
                    if let Some(row) = self.rows.get_mut(&id) {
                        row.visible = visible;
                    }
                }
            }
        }

        fn close_menu(&mut self) {
            self.open = false;
            self.close_count += 1;
        }
    }

    #[test]
    fn insert_shifts_down() {
        let mut menu = TestMenu::default();
        let a = menu.create_row(RowContent::Separator);
        let b = menu.create_row(RowContent::Separator);
        let c = menu.create_row(RowContent::Separator);

        menu.insert_row_at(a, 0);
        menu.insert_row_at(b, 1);
        menu.insert_row_at(c, 1);

        assert_eq!(menu.order, vec![a, c, b]);

        menu.remove_row(c);
        assert_eq!(menu.order, vec![a, b]);
    }

    #[test]
    fn row_ids_unique() {
        assert_ne!(RowId::next(), RowId::next());
    }
}
