use gtk::Widget;
use gtk::prelude::*;

pub trait PowerletGtkExt {
    /// Gets the child at index `n`, counting hidden children.
    fn nth_child(&self, n: usize) -> Option<Widget>;

    /// Adds each class in `classes` to the widget.
    fn add_css_classes(&self, classes: &[&str]);
}

impl<W: IsA<Widget>> PowerletGtkExt for W {
    fn nth_child(&self, n: usize) -> Option<Widget> {
        let mut child = self.first_child();

        for _ in 0..n {
            child = child?.next_sibling();
        }

        child
    }

    fn add_css_classes(&self, classes: &[&str]) {
        for class in classes {
            self.add_css_class(class);
        }
    }
}

/// Gets the icon name to load for a glyph,
/// requesting the symbolic variant if `symbolic` is set.
pub fn icon_name(glyph: &str, symbolic: bool) -> String {
    if symbolic && !glyph.ends_with("-symbolic") {
        format!("{glyph}-symbolic")
    } else {
        glyph.to_string()
    }
}
