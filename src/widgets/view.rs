use super::Style;

/// A node of the declarative view tree.
///
/// Views are plain values: a style snapshot plus children. A renderer (or
/// [`crate::layout::layout_view`]) consumes them; they hold no reactive state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub key: Option<String>,
    pub style: Style,
    pub children: Vec<View>,
}

/// Create an empty view.
pub fn view() -> View {
    View::default()
}

impl View {
    /// Stable identity among siblings.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Merge `style` over the current style; properties it sets win.
    pub fn style(mut self, style: Style) -> Self {
        self.style = self.style.merge(&style);
        self
    }

    pub fn child(mut self, child: View) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = View>) -> Self {
        self.children.extend(children);
        self
    }

    /// Depth-first search for a descendant (or self) with the given key.
    pub fn find(&self, key: &str) -> Option<&View> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }
}
