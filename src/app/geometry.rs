use crate::model::Point;

/// World metres covered by one pixel at zoom 1.
pub const PIXEL_TO_WORLD_FACTOR: f64 = 0.1;

const LABEL_CHAR_WIDTH: f64 = 0.6;
const LABEL_LINE_HEIGHT: f64 = 1.2;
const SCALE_EPS: f64 = 1e-9;

/// Pixel space is centred on the canvas and grows downward; world space is
/// in metres and grows upward.
pub fn world_to_pixel(world: Point, pan: Point, zoom: f64) -> Point {
    Point {
        x: world.x * zoom / PIXEL_TO_WORLD_FACTOR + pan.x * zoom,
        y: -(world.y * zoom / PIXEL_TO_WORLD_FACTOR + pan.y * zoom),
    }
}

pub fn pixel_to_world(pixel: Point, pan: Point, zoom: f64) -> Point {
    Point {
        x: PIXEL_TO_WORLD_FACTOR * (pixel.x / zoom - pan.x),
        y: PIXEL_TO_WORLD_FACTOR * (-pixel.y / zoom - pan.y),
    }
}

pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Axis-aligned pixel box of a label whose anchor (top-left) projects to
/// `anchor`: `(min, max)`.
pub(super) fn label_bounds(anchor: Point, chars: usize, size: f64, zoom: f64) -> (Point, Point) {
    let font_px = size * zoom;
    let width = chars.max(1) as f64 * font_px * LABEL_CHAR_WIDTH;
    let height = font_px * LABEL_LINE_HEIGHT;
    (anchor, Point::new(anchor.x + width, anchor.y + height))
}

pub(super) fn contains(bounds: (Point, Point), p: Point) -> bool {
    let (min, max) = bounds;
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

/// Rounded world length for the scale bar at `zoom` and its width in pixels.
pub fn scale_bar(zoom: f64) -> (f64, f64) {
    let log = zoom.log10() - 1.0;
    let magnitude = 10f64.powf((-log).floor());
    let fraction = 10f64.powf(-log) / magnitude;
    let rounded = if fraction <= 1.0 + SCALE_EPS {
        1.0
    } else if fraction <= 2.0 + SCALE_EPS {
        2.0
    } else if fraction <= 5.0 + SCALE_EPS {
        5.0
    } else {
        10.0
    };
    let world = rounded * magnitude;
    (world, world / PIXEL_TO_WORLD_FACTOR * zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn origin_maps_to_centre() {
        assert_eq!(world_to_pixel(Point::ZERO, Point::ZERO, 1.0), Point::ZERO);
        let p = world_to_pixel(Point::new(1.0, 1.0), Point::ZERO, 2.0);
        assert!(close(p, Point::new(20.0, -20.0)));
    }

    #[test]
    fn pixel_to_world_inverts_world_to_pixel() {
        let pan = Point::new(13.0, -7.5);
        for zoom in [0.1, 0.75, 1.0, 3.0, 50.0] {
            for w in [Point::new(0.0, 0.0), Point::new(2.5, -1.25), Point::new(-40.0, 12.0)] {
                let back = pixel_to_world(world_to_pixel(w, pan, zoom), pan, zoom);
                assert!(close(back, w), "{w:?} at zoom {zoom} came back as {back:?}");
            }
        }
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn label_box_scales_with_zoom() {
        let (min, max) = label_bounds(Point::new(10.0, 10.0), 4, 12.0, 2.0);
        assert_eq!(min, Point::new(10.0, 10.0));
        assert!((max.x - (10.0 + 4.0 * 24.0 * 0.6)).abs() < 1e-9);
        assert!((max.y - (10.0 + 24.0 * 1.2)).abs() < 1e-9);
        let empty = label_bounds(Point::ZERO, 0, 10.0, 1.0);
        assert!((empty.1.x - 6.0).abs() < 1e-9);
        assert!(contains((min, max), Point::new(11.0, 20.0)));
        assert!(!contains((min, max), Point::new(9.0, 20.0)));
    }

    #[test]
    fn scale_bar_rounds_to_one_two_five() {
        let (world, px) = scale_bar(1.0);
        assert!((world - 10.0).abs() < 1e-9);
        assert!((px - 100.0).abs() < 1e-9);

        let (world, _) = scale_bar(3.0);
        assert!((world - 5.0).abs() < 1e-9);

        let (world, _) = scale_bar(0.3);
        assert!((world - 50.0).abs() < 1e-9);
    }
}
