use crate::{
    foundation::core::{Canvas, LayerBox, Point},
    layout::scale::ScaleFactor,
    settings::model::{AnchorPlacement, AxisAnchor, LinkAlignment, LinkPlacement, Placement},
};

/// Resolve a layer's draw origin (top-left of its glyph box).
///
/// A linked placement follows `main` when it is `Some`; without a main box it falls
/// back to its own anchor. Main must be fully resolved before a linked layer is.
pub fn resolve_origin(
    canvas: Canvas,
    width: f64,
    height: f64,
    placement: &Placement,
    main: Option<&LayerBox>,
    scale: ScaleFactor,
) -> Point {
    match (placement, main) {
        (Placement::Linked { link, .. }, Some(main)) => linked_origin(main, width, link, scale),
        _ => anchor_origin(canvas, width, height, placement.anchor(), scale),
    }
}

/// Origin on the 3x3 anchor grid, displaced inward by the scaled offsets.
pub fn anchor_origin(
    canvas: Canvas,
    width: f64,
    height: f64,
    placement: &AnchorPlacement,
    scale: ScaleFactor,
) -> Point {
    let x = axis_origin(
        f64::from(canvas.width),
        width,
        placement.anchor.horizontal(),
        scale.px(placement.offset_x),
    );
    let y = axis_origin(
        f64::from(canvas.height),
        height,
        placement.anchor.vertical(),
        scale.px(placement.offset_y),
    );
    Point::new(x, y)
}

/// Origin below `main`, aligned against its box.
pub fn linked_origin(
    main: &LayerBox,
    width: f64,
    link: &LinkPlacement,
    scale: ScaleFactor,
) -> Point {
    let y = main.bottom() + scale.px(link.spacing);
    let x = match link.alignment {
        LinkAlignment::Left => main.x,
        LinkAlignment::Center => main.x + (main.w - width) / 2.0,
        LinkAlignment::Right => main.x + main.w - width,
    };
    Point::new(x, y)
}

fn axis_origin(container: f64, content: f64, anchor: AxisAnchor, inward: f64) -> f64 {
    match anchor {
        AxisAnchor::Start => inward,
        AxisAnchor::Center => (container - content) / 2.0,
        AxisAnchor::End => container - content - inward,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
