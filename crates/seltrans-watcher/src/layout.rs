use seltrans_types::{Point, Rect, Size};

/// `clamp(desired, 0, viewport - control)`. When the control is larger
/// than the viewport the upper bound collapses to 0.
pub fn clamp_axis(desired: f64, viewport: f64, control: f64) -> f64 {
    let max = (viewport - control).max(0.0);
    if desired.is_nan() {
        return 0.0;
    }
    desired.clamp(0.0, max)
}

pub fn clamp_point(desired: Point, viewport: Size, control: Size) -> Point {
    Point::new(
        clamp_axis(desired.x, viewport.width, control.width),
        clamp_axis(desired.y, viewport.height, control.height),
    )
}

/// Just past the bottom-right corner of the selection
pub fn trigger_position(selection: Rect, viewport: Size, trigger: Size, gap: f64) -> Point {
    clamp_point(
        Point::new(selection.right + gap, selection.bottom + gap),
        viewport,
        trigger,
    )
}

/// Under the selection, below where the trigger sits
pub fn popup_position(
    selection: Rect,
    viewport: Size,
    popup: Size,
    trigger: Size,
    gap: f64,
) -> Point {
    clamp_point(
        Point::new(selection.left, selection.bottom + gap + trigger.height),
        viewport,
        popup,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size {
        width: 800.0,
        height: 600.0,
    };
    const TRIGGER: Size = Size {
        width: 60.0,
        height: 30.0,
    };
    const POPUP: Size = Size {
        width: 300.0,
        height: 100.0,
    };

    fn in_bounds(p: Point, control: Size) -> bool {
        (0.0..=VIEWPORT.width - control.width).contains(&p.x)
            && (0.0..=VIEWPORT.height - control.height).contains(&p.y)
    }

    #[test]
    fn inside_viewport_is_untouched() {
        assert_eq!(clamp_axis(120.0, 800.0, 60.0), 120.0);
        let p = trigger_position(Rect::new(100.0, 100.0, 50.0, 20.0), VIEWPORT, TRIGGER, 4.0);
        assert_eq!(p, Point::new(154.0, 124.0));
    }

    #[test]
    fn clamps_both_edges() {
        assert_eq!(clamp_axis(-35.0, 800.0, 60.0), 0.0);
        assert_eq!(clamp_axis(790.0, 800.0, 60.0), 740.0);
        assert_eq!(clamp_axis(f64::INFINITY, 800.0, 60.0), 740.0);
        assert_eq!(clamp_axis(f64::NAN, 800.0, 60.0), 0.0);
    }

    #[test]
    fn oversized_control_pins_to_origin() {
        assert_eq!(clamp_axis(50.0, 200.0, 300.0), 0.0);
    }

    #[test]
    fn any_selection_rect_stays_in_bounds() {
        let rects = [
            Rect::new(-500.0, -300.0, 40.0, 10.0),
            Rect::new(-10.0, -10.0, 2000.0, 1500.0),
            Rect::new(780.0, 590.0, 15.0, 8.0),
            Rect::new(0.0, 0.0, 0.0, 0.0),
            Rect::new(10_000.0, 10_000.0, 1.0, 1.0),
        ];

        for rect in rects {
            let t = trigger_position(rect, VIEWPORT, TRIGGER, 4.0);
            assert!(in_bounds(t, TRIGGER), "trigger {t:?} for {rect:?}");

            let p = popup_position(rect, VIEWPORT, POPUP, TRIGGER, 4.0);
            assert!(in_bounds(p, POPUP), "popup {p:?} for {rect:?}");
        }
    }

    #[test]
    fn popup_sits_below_trigger_row() {
        let p = popup_position(Rect::new(40.0, 100.0, 50.0, 20.0), VIEWPORT, POPUP, TRIGGER, 4.0);
        assert_eq!(p, Point::new(40.0, 154.0));
    }
}
