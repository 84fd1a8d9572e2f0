use crate::model::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub sensitivity: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 50.0,
            default: 1.0,
            sensitivity: 0.0002,
        }
    }
}

impl ZoomLimits {
    /// Finite, with `0 < min <= default <= max` and a finite sensitivity.
    pub fn is_valid(&self) -> bool {
        [self.min, self.max, self.default, self.sensitivity]
            .iter()
            .all(|v| v.is_finite())
            && self.min > 0.0
            && self.min <= self.default
            && self.default <= self.max
    }

    fn or_default(self) -> Self {
        if self.is_valid() { self } else { Self::default() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PanState {
    Idle,
    Panning { start: Point },
}

/// Pan offsets are kept in zoom-independent pixel units: the saved part from
/// finished pans and the live part of the pan in progress.
#[derive(Clone, Copy, Debug)]
pub struct ViewState {
    saved: Point,
    live: Point,
    pan: PanState,
    zoom: f64,
    zoom_listening: bool,
    limits: ZoomLimits,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}

impl ViewState {
    pub fn new(limits: ZoomLimits) -> Self {
        let limits = limits.or_default();
        Self {
            saved: Point::ZERO,
            live: Point::ZERO,
            pan: PanState::Idle,
            zoom: limits.default.clamp(limits.min, limits.max),
            zoom_listening: false,
            limits,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.pan, PanState::Panning { .. })
    }

    pub fn set_limits(&mut self, limits: ZoomLimits) {
        let limits = limits.or_default();
        self.limits = limits;
        self.zoom = self.zoom.clamp(limits.min, limits.max);
    }

    /// Combined offset fed to the world/pixel transform.
    pub fn pan_offset(&self) -> Point {
        Point {
            x: self.live.x + self.saved.x,
            y: -(self.live.y + self.saved.y),
        }
    }

    pub fn start_pan(&mut self, pixel: Point) {
        if !self.is_panning() {
            self.pan = PanState::Panning { start: pixel };
        }
    }

    pub fn update_pan(&mut self, pixel: Point) {
        if let PanState::Panning { start } = self.pan {
            self.live = Point {
                x: (pixel.x - start.x) / self.zoom,
                y: (pixel.y - start.y) / self.zoom,
            };
        }
    }

    pub fn finish_pan(&mut self) {
        if !self.is_panning() {
            return;
        }
        self.saved = self.saved.offset(self.live);
        self.live = Point::ZERO;
        self.pan = PanState::Idle;
    }

    pub fn reset_pan(&mut self) {
        self.saved = Point::ZERO;
    }

    pub fn start_zoom_listening(&mut self) {
        self.zoom_listening = true;
    }

    pub fn stop_zoom_listening(&mut self) {
        self.zoom_listening = false;
    }

    /// `delta_y` follows the browser wheel convention: positive scrolls down
    /// and zooms out. Returns whether the zoom changed.
    pub fn zoom_by_wheel(&mut self, delta_y: f64) -> bool {
        if !self.zoom_listening || !delta_y.is_finite() {
            return false;
        }
        let proposed = self.zoom + self.zoom * delta_y * -self.limits.sensitivity;
        let next = proposed.clamp(self.limits.min, self.limits.max);
        let changed = next != self.zoom;
        self.zoom = next;
        changed
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = self.limits.default.clamp(self.limits.min, self.limits.max);
    }

    pub fn world_to_pixel(&self, world: Point) -> Point {
        super::geometry::world_to_pixel(world, self.pan_offset(), self.zoom)
    }

    pub fn pixel_to_world(&self, pixel: Point) -> Point {
        super::geometry::pixel_to_world(pixel, self.pan_offset(), self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pans_accumulate() {
        let mut view = ViewState::default();
        view.start_pan(Point::new(10.0, 10.0));
        view.update_pan(Point::new(30.0, 0.0));
        assert_eq!(view.pan_offset(), Point::new(20.0, 10.0));
        view.finish_pan();
        assert!(!view.is_panning());

        view.start_pan(Point::ZERO);
        view.update_pan(Point::new(5.0, 5.0));
        view.finish_pan();
        assert_eq!(view.pan_offset(), Point::new(25.0, 5.0));

        view.finish_pan();
        assert_eq!(view.pan_offset(), Point::new(25.0, 5.0));
        view.reset_pan();
        assert_eq!(view.pan_offset(), Point::ZERO);
    }

    #[test]
    fn dragged_world_point_follows_the_pointer() {
        let mut view = ViewState::default();
        view.start_zoom_listening();
        view.zoom_by_wheel(-2500.0);
        let w = Point::new(3.0, -2.0);
        let before = view.world_to_pixel(w);

        view.start_pan(Point::new(100.0, 100.0));
        view.update_pan(Point::new(140.0, 70.0));
        let after = view.world_to_pixel(w);
        assert!((after.x - before.x - 40.0).abs() < 1e-9);
        assert!((after.y - before.y + 30.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_ignored_until_listening() {
        let mut view = ViewState::default();
        assert!(!view.zoom_by_wheel(-100.0));
        assert_eq!(view.zoom(), 1.0);
        view.start_zoom_listening();
        assert!(view.zoom_by_wheel(-100.0));
        assert!((view.zoom() - 1.02).abs() < 1e-12);
        view.stop_zoom_listening();
        assert!(!view.zoom_by_wheel(-100.0));
    }

    #[test]
    fn zoom_clamps_to_limits() {
        let mut view = ViewState::default();
        view.start_zoom_listening();
        // proposed 1 + 1 * -300000 * -0.0002 = 61
        assert!(view.zoom_by_wheel(-300_000.0));
        assert_eq!(view.zoom(), 50.0);
        assert!(!view.zoom_by_wheel(-5000.0));

        view.zoom_by_wheel(1.0e7);
        assert_eq!(view.zoom(), 0.1);

        view.reset_zoom();
        assert_eq!(view.zoom(), 1.0);
    }

    #[test]
    fn unusable_limits_fall_back_to_defaults() {
        let bad = [
            ZoomLimits { min: f64::NAN, ..Default::default() },
            ZoomLimits { min: 0.0, ..Default::default() },
            ZoomLimits { min: -1.0, ..Default::default() },
            ZoomLimits { default: 80.0, ..Default::default() },
            ZoomLimits { sensitivity: f64::INFINITY, ..Default::default() },
        ];
        for limits in bad {
            assert!(!limits.is_valid(), "{limits:?}");
            let mut view = ViewState::new(limits);
            assert_eq!(view.zoom(), 1.0);
            view.start_zoom_listening();
            view.zoom_by_wheel(1.0e9);
            assert_eq!(view.zoom(), 0.1);
        }

        let mut view = ViewState::default();
        view.set_limits(ZoomLimits { max: f64::NAN, ..Default::default() });
        view.start_zoom_listening();
        view.zoom_by_wheel(-1.0e9);
        assert_eq!(view.zoom(), 50.0);
    }
}
