use super::{Axis, Constraints, CrossAxisAlignment, MainAxisAlignment, Rect, Size};
use crate::widgets::{Style, View};

/// Computed frame of one view and its children.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub key: Option<String>,
    pub rect: Rect,
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    /// Depth-first search for a node (or self) with the given key.
    pub fn find(&self, key: &str) -> Option<&LayoutNode> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }
}

/// Lay out `view` at the origin.
///
/// The root takes its explicit width and height, fills bounded constraints
/// on the other axes, and falls back to its content size when unbounded.
pub fn layout_view(view: &View, constraints: Constraints) -> LayoutNode {
    let filled = constraints.fill(intrinsic_size(view));
    let size = Size::new(
        view.style.width.map_or(filled.width, dimension),
        view.style.height.map_or(filled.height, dimension),
    );
    arrange(view, Rect::from_size(size))
}

// Negative and NaN sizes collapse to zero
fn dimension(value: f32) -> f32 {
    value.max(0.0)
}

fn direction(style: &Style) -> Axis {
    style.flex_direction.unwrap_or_default()
}

/// Explicit (main, cross) extents of a style along `axis`.
fn explicit_axes(style: &Style, axis: Axis) -> (Option<f32>, Option<f32>) {
    let (main, cross) = match axis {
        Axis::Horizontal => (style.width, style.height),
        Axis::Vertical => (style.height, style.width),
    };
    (main.map(dimension), cross.map(dimension))
}

/// Size a view wants with no outside pressure: its explicit size, else the
/// extent of its relative children stacked along its own axis.
fn intrinsic_size(view: &View) -> Size {
    let axis = direction(&view.style);
    let mut main = 0.0f32;
    let mut cross = 0.0f32;

    for child in view.children.iter().filter(|child| !child.style.is_absolute()) {
        let size = intrinsic_size(child);
        main += size.main_axis(axis);
        cross = cross.max(size.cross_axis(axis));
    }

    let content = Size::from_axes(axis, main, cross);
    Size::new(
        view.style.width.map_or(content.width, dimension),
        view.style.height.map_or(content.height, dimension),
    )
}

/// Initial offset and gap between children for a main axis alignment.
fn calc_main_axis_spacing(
    main_align: MainAxisAlignment,
    free_space: f32,
    child_count: usize,
) -> (f32, f32) {
    match main_align {
        MainAxisAlignment::Start => (0.0, 0.0),
        MainAxisAlignment::Center => (free_space / 2.0, 0.0),
        MainAxisAlignment::End => (free_space, 0.0),
        MainAxisAlignment::SpaceBetween => {
            if child_count > 1 {
                (0.0, free_space / (child_count - 1) as f32)
            } else {
                (0.0, 0.0)
            }
        }
        MainAxisAlignment::SpaceAround => {
            let space = free_space / child_count.max(1) as f32;
            (space / 2.0, space)
        }
        MainAxisAlignment::SpaceEvenly => {
            let space = free_space / (child_count + 1) as f32;
            (space, space)
        }
    }
}

/// Lay out the children of `view`, which already has its frame.
fn arrange(view: &View, rect: Rect) -> LayoutNode {
    let style = &view.style;
    let axis = direction(style);
    let justify = style.justify_content.unwrap_or_default();
    let align = style.align_items.unwrap_or_default();
    let main_size = rect.size().main_axis(axis);
    let cross_size = rect.size().cross_axis(axis);

    let relative: Vec<&View> = view
        .children
        .iter()
        .filter(|child| !child.style.is_absolute())
        .collect();

    // First pass: base sizes. Flex children start from zero and grow.
    let mut sizes: Vec<(f32, f32)> = Vec::with_capacity(relative.len());
    let mut total_main = 0.0f32;
    let mut total_flex = 0.0f32;
    for child in &relative {
        let intrinsic = intrinsic_size(child);
        let (explicit_main, explicit_cross) = explicit_axes(&child.style, axis);
        let flex = child.style.flex.filter(|flex| *flex > 0.0);

        let main = match (explicit_main, flex) {
            (Some(main), _) => main,
            (None, Some(flex)) => {
                total_flex += flex;
                0.0
            }
            (None, None) => intrinsic.main_axis(axis),
        };
        let cross = explicit_cross.unwrap_or(if align == CrossAxisAlignment::Stretch {
            cross_size
        } else {
            intrinsic.cross_axis(axis)
        });

        total_main += main;
        sizes.push((main, cross));
    }

    let mut free_space = main_size - total_main;
    if free_space > 0.0 && total_flex > 0.0 {
        for (child, (main, _)) in relative.iter().zip(sizes.iter_mut()) {
            if let (None, Some(flex)) = (explicit_axes(&child.style, axis).0, child.style.flex) {
                if flex > 0.0 {
                    *main += free_space * flex / total_flex;
                }
            }
        }
        free_space = 0.0;
    }

    // Second pass: positions
    let (initial_offset, gap) = calc_main_axis_spacing(justify, free_space.max(0.0), relative.len());
    let mut main_pos = initial_offset;
    let mut children = Vec::with_capacity(view.children.len());
    let mut relative_frames = relative.iter().zip(sizes.iter());

    for child in &view.children {
        let frame = if child.style.is_absolute() {
            place_absolute(child, rect, axis, justify, align)
        } else {
            let Some((_, &(main, cross))) = relative_frames.next() else {
                continue;
            };
            let cross_pos = match align {
                CrossAxisAlignment::Start | CrossAxisAlignment::Stretch => 0.0,
                CrossAxisAlignment::Center => (cross_size - cross) / 2.0,
                CrossAxisAlignment::End => cross_size - cross,
            };
            let origin = Size::from_axes(axis, main_pos, cross_pos);
            let size = Size::from_axes(axis, main, cross);
            main_pos += main + gap;

            let (dx, dy) = relative_offset(&child.style);
            Rect::new(rect.x + origin.width, rect.y + origin.height, size.width, size.height)
                .offset(dx, dy)
        };
        children.push(arrange(child, frame));
    }

    LayoutNode {
        key: view.key.clone(),
        rect,
        children,
    }
}

/// Visual shift of a relative child from its insets.
fn relative_offset(style: &Style) -> (f32, f32) {
    let dx = style.left.or(style.right.map(|right| -right)).unwrap_or(0.0);
    let dy = style.top.or(style.bottom.map(|bottom| -bottom)).unwrap_or(0.0);
    (dx, dy)
}

/// Frame of an absolutely positioned child inside `parent`.
///
/// Insets win. An axis without insets is aligned like the container aligns
/// its children; space distributions count as start.
fn place_absolute(
    child: &View,
    parent: Rect,
    axis: Axis,
    justify: MainAxisAlignment,
    align: CrossAxisAlignment,
) -> Rect {
    let style = &child.style;
    let intrinsic = intrinsic_size(child);

    let stretched = |start: Option<f32>, end: Option<f32>, extent: f32| match (start, end) {
        (Some(start), Some(end)) => Some(dimension(extent - start - end)),
        _ => None,
    };
    let width = style
        .width
        .map(dimension)
        .or_else(|| stretched(style.left, style.right, parent.width))
        .unwrap_or(intrinsic.width);
    let height = style
        .height
        .map(dimension)
        .or_else(|| stretched(style.top, style.bottom, parent.height))
        .unwrap_or(intrinsic.height);

    let free = Size::new(parent.width - width, parent.height - height);
    let main_offset = match justify {
        MainAxisAlignment::Center => free.main_axis(axis) / 2.0,
        MainAxisAlignment::End => free.main_axis(axis),
        _ => 0.0,
    };
    let cross_offset = match align {
        CrossAxisAlignment::Center => free.cross_axis(axis) / 2.0,
        CrossAxisAlignment::End => free.cross_axis(axis),
        _ => 0.0,
    };
    let aligned = Size::from_axes(axis, main_offset, cross_offset);

    let x = style
        .left
        .or(style.right.map(|right| parent.width - right - width))
        .unwrap_or(aligned.width);
    let y = style
        .top
        .or(style.bottom.map(|bottom| parent.height - bottom - height))
        .unwrap_or(aligned.height);

    Rect::new(parent.x + x, parent.y + y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{view, Position};

    fn boxed(width: f32, height: f32) -> View {
        view().style(Style::new().width(width).height(height))
    }

    #[test]
    fn test_root_fills_bounded_constraints() {
        let node = layout_view(&view(), Constraints::loose(Size::new(300.0, 200.0)));
        assert_eq!(node.rect, Rect::new(0.0, 0.0, 300.0, 200.0));
    }

    #[test]
    fn test_root_explicit_size_wins() {
        let node = layout_view(
            &view().style(Style::new().width(120.0)),
            Constraints::loose(Size::new(300.0, 200.0)),
        );
        assert_eq!(node.rect.size(), Size::new(120.0, 200.0));
    }

    #[test]
    fn test_unbounded_root_takes_content_size() {
        let tree = view().child(boxed(40.0, 10.0)).child(boxed(20.0, 30.0));
        let node = layout_view(&tree, Constraints::unbounded());
        // Column by default
        assert_eq!(node.rect.size(), Size::new(40.0, 40.0));
    }

    #[test]
    fn test_column_stretches_children() {
        let tree = view().child(view().style(Style::new().height(10.0)));
        let node = layout_view(&tree, Constraints::tight(Size::new(100.0, 100.0)));
        assert_eq!(node.children[0].rect, Rect::new(0.0, 0.0, 100.0, 10.0));
    }

    #[test]
    fn test_row_centered() {
        let tree = view()
            .style(
                Style::new()
                    .flex_direction(Axis::Horizontal)
                    .justify_content(MainAxisAlignment::Center)
                    .align_items(CrossAxisAlignment::Center),
            )
            .child(boxed(20.0, 10.0))
            .child(boxed(30.0, 20.0));
        let node = layout_view(&tree, Constraints::tight(Size::new(100.0, 40.0)));

        assert_eq!(node.children[0].rect, Rect::new(25.0, 15.0, 20.0, 10.0));
        assert_eq!(node.children[1].rect, Rect::new(45.0, 10.0, 30.0, 20.0));
    }

    #[test]
    fn test_space_between() {
        let tree = view()
            .style(
                Style::new()
                    .flex_direction(Axis::Horizontal)
                    .justify_content(MainAxisAlignment::SpaceBetween),
            )
            .child(boxed(10.0, 10.0))
            .child(boxed(10.0, 10.0));
        let node = layout_view(&tree, Constraints::tight(Size::new(100.0, 10.0)));

        assert_eq!(node.children[0].rect.x, 0.0);
        assert_eq!(node.children[1].rect.x, 90.0);
    }

    #[test]
    fn test_flex_grow_shares_free_space() {
        let tree = view()
            .child(boxed(10.0, 20.0))
            .child(view().style(Style::new().flex(1.0)))
            .child(view().style(Style::new().flex(3.0)));
        let node = layout_view(&tree, Constraints::tight(Size::new(50.0, 100.0)));

        assert_eq!(node.children[1].rect, Rect::new(0.0, 20.0, 50.0, 20.0));
        assert_eq!(node.children[2].rect, Rect::new(0.0, 40.0, 50.0, 60.0));
    }

    #[test]
    fn test_absolute_child_centered_by_alignment() {
        let tree = view()
            .style(Style::centered_container())
            .child(boxed(40.0, 40.0).style(Style::new().position(Position::Absolute)));
        let node = layout_view(&tree, Constraints::tight(Size::new(100.0, 200.0)));

        assert_eq!(node.children[0].rect, Rect::new(30.0, 80.0, 40.0, 40.0));
    }

    #[test]
    fn test_absolute_child_insets() {
        let tree = view().child(
            view().style(
                Style::new()
                    .position(Position::Absolute)
                    .left(10.0)
                    .right(20.0)
                    .bottom(5.0)
                    .height(15.0),
            ),
        );
        let node = layout_view(&tree, Constraints::tight(Size::new(100.0, 100.0)));

        assert_eq!(node.children[0].rect, Rect::new(10.0, 80.0, 70.0, 15.0));
    }

    #[test]
    fn test_absolute_children_do_not_take_space() {
        let tree = view()
            .child(boxed(10.0, 10.0).style(Style::new().position(Position::Absolute)))
            .child(boxed(10.0, 10.0));
        let node = layout_view(&tree, Constraints::unbounded());

        assert_eq!(node.rect.size(), Size::new(10.0, 10.0));
        assert_eq!(node.children[1].rect.y, 0.0);
    }

    #[test]
    fn test_negative_size_collapses() {
        let node = layout_view(&boxed(-5.0, f32::NAN), Constraints::unbounded());
        assert_eq!(node.rect.size(), Size::zero());
    }

    #[test]
    fn test_find_node() {
        let tree = view().child(boxed(10.0, 10.0).key("inner"));
        let node = layout_view(&tree, Constraints::unbounded());
        assert_eq!(node.find("inner").map(|n| n.rect.height), Some(10.0));
    }
}
