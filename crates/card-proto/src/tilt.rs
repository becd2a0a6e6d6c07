//! Pointer-driven tilt: pointer position over a surface -> smoothed rotation
//! and brightness.

use crate::config::TiltConfig;
use crate::spring::Spring;

/// Axis-aligned rectangle the pointer moves over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Pointer offset from the centre as a fraction of the extent:
    /// centre -> 0, edges -> ±0.5. `None` for a degenerate surface.
    pub fn fraction(&self, px: f64, py: f64) -> Option<(f64, f64)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let fx = ((px - self.x) / self.width - 0.5).clamp(-0.5, 0.5);
        let fy = ((py - self.y) / self.height - 0.5).clamp(-0.5, 0.5);
        Some((fx, fy))
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltTransform {
    /// Rotation around the X axis; positive raises the bottom edge.
    pub rotate_x_deg: f64,
    /// Rotation around the Y axis; positive brings the right edge forward.
    pub rotate_y_deg: f64,
    pub brightness: f64,
}

impl TiltTransform {
    pub const NEUTRAL: Self = Self {
        rotate_x_deg: 0.0,
        rotate_y_deg: 0.0,
        brightness: 1.0,
    };
}

impl Default for TiltTransform {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Linear map of `v` from `from` onto `to`, clamped to the output range.
pub fn map_range(v: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return to.0;
    }
    let t = ((v - from.0) / span).clamp(0.0, 1.0);
    to.0 + (to.1 - to.0) * t
}

#[derive(Debug, Clone)]
pub struct TiltEngine {
    x: Spring,
    y: Spring,
    max_rotation_deg: f64,
    brightness: (f64, f64),
}

impl TiltEngine {
    pub fn new(config: &TiltConfig) -> Self {
        Self {
            x: Spring::new(config.stiffness, config.damping),
            y: Spring::new(config.stiffness, config.damping),
            max_rotation_deg: config.max_rotation_deg,
            brightness: (config.brightness_min, config.brightness_max),
        }
    }

    pub fn pointer_move(&mut self, surface: Surface, px: f64, py: f64) {
        if let Some((fx, fy)) = surface.fraction(px, py) {
            self.x.set_target(fx);
            self.y.set_target(fy);
        }
    }

    /// Targets go back to centre; the springs carry the surface there.
    pub fn pointer_leave(&mut self) {
        self.x.set_target(0.0);
        self.y.set_target(0.0);
    }

    /// Drop all motion and return to neutral immediately.
    pub fn reset(&mut self) {
        self.x.snap_to(0.0);
        self.y.snap_to(0.0);
    }

    /// Advance both filters. Returns `true` while either axis is moving.
    pub fn step(&mut self, dt: f64) -> bool {
        let x_moving = self.x.step(dt);
        let y_moving = self.y.step(dt);
        x_moving || y_moving
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled()
    }

    pub fn raw(&self) -> (f64, f64) {
        (self.x.target(), self.y.target())
    }

    pub fn smoothed(&self) -> (f64, f64) {
        (self.x.value(), self.y.value())
    }

    /// Rotation follows the full [-0.5, 0.5] range on each axis. Brightness
    /// stays at its minimum over the left half and the centre, and ramps up
    /// to its maximum at the right edge, so a card at rest is unlit.
    pub fn transform(&self) -> TiltTransform {
        let max = self.max_rotation_deg;
        let (sx, sy) = self.smoothed();
        TiltTransform {
            rotate_x_deg: map_range(sy, (-0.5, 0.5), (max, -max)),
            rotate_y_deg: map_range(sx, (-0.5, 0.5), (-max, max)),
            brightness: map_range(sx, (0.0, 0.5), self.brightness),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn engine() -> TiltEngine {
        TiltEngine::new(&TiltConfig::default())
    }

    fn settle(e: &mut TiltEngine) {
        for _ in 0..600 {
            if !e.step(FRAME) {
                return;
            }
        }
        panic!("tilt never settled");
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_fraction_centre_and_corners() {
        let s = Surface::new(10.0, 20.0, 40.0, 20.0);
        assert_eq!(s.fraction(30.0, 30.0), Some((0.0, 0.0)));
        assert_eq!(s.fraction(10.0, 20.0), Some((-0.5, -0.5)));
        assert_eq!(s.fraction(50.0, 40.0), Some((0.5, 0.5)));
        assert_eq!(s.fraction(500.0, -100.0), Some((0.5, -0.5)));
        assert_eq!(Surface::new(0.0, 0.0, 0.0, 10.0).fraction(0.0, 0.0), None);
    }

    #[test]
    fn test_centre_is_neutral() {
        let s = Surface::new(0.0, 0.0, 100.0, 50.0);
        let mut e = engine();
        e.pointer_move(s, 50.0, 25.0);
        settle(&mut e);
        let t = e.transform();
        assert!(approx(t.rotate_x_deg, 0.0));
        assert!(approx(t.rotate_y_deg, 0.0));
        assert!(approx(t.brightness, 1.0));
    }

    #[test]
    fn test_top_left_corner() {
        let s = Surface::new(0.0, 0.0, 100.0, 50.0);
        let mut e = engine();
        e.pointer_move(s, 0.0, 0.0);
        settle(&mut e);
        let t = e.transform();
        assert!(approx(t.rotate_x_deg, 15.0));
        assert!(approx(t.rotate_y_deg, -15.0));
        assert!(approx(t.brightness, 1.0));
    }

    #[test]
    fn test_bottom_right_corner() {
        let s = Surface::new(0.0, 0.0, 100.0, 50.0);
        let mut e = engine();
        e.pointer_move(s, 100.0, 50.0);
        settle(&mut e);
        let t = e.transform();
        assert!(approx(t.rotate_x_deg, -15.0));
        assert!(approx(t.rotate_y_deg, 15.0));
        assert!(approx(t.brightness, 1.2));
    }

    #[test]
    fn test_brightness_ramps_on_right_half() {
        let s = Surface::new(0.0, 0.0, 100.0, 50.0);
        let mut e = engine();
        e.pointer_move(s, 75.0, 25.0);
        settle(&mut e);
        assert!(approx(e.transform().brightness, 1.1));
        e.pointer_move(s, 25.0, 25.0);
        settle(&mut e);
        assert!(approx(e.transform().brightness, 1.0));
    }

    #[test]
    fn test_leave_animates_back_to_rest() {
        let s = Surface::new(0.0, 0.0, 100.0, 50.0);
        let mut e = engine();
        e.pointer_move(s, 100.0, 50.0);
        settle(&mut e);

        e.pointer_leave();
        assert_eq!(e.raw(), (0.0, 0.0));
        assert_eq!(e.smoothed(), (0.5, 0.5));

        let mut intermediate = 0;
        let mut last = e.smoothed().0;
        while e.step(FRAME) {
            let (x, _) = e.smoothed();
            assert!(x <= last);
            if x > 0.0 && x < 0.5 {
                intermediate += 1;
            }
            last = x;
        }
        assert!(intermediate > 3, "only {} intermediate frames", intermediate);
        assert_eq!(e.smoothed(), (0.0, 0.0));
        assert_eq!(e.transform().rotate_x_deg, 0.0);
    }

    #[test]
    fn test_reset_is_immediate() {
        let s = Surface::new(0.0, 0.0, 100.0, 50.0);
        let mut e = engine();
        e.pointer_move(s, 0.0, 0.0);
        e.step(FRAME);
        e.reset();
        assert!(e.is_settled());
        assert_eq!(e.transform(), TiltTransform::NEUTRAL);
    }

    #[test]
    fn test_map_range_clamps() {
        assert_eq!(map_range(2.0, (-0.5, 0.5), (15.0, -15.0)), -15.0);
        assert_eq!(map_range(-2.0, (-0.5, 0.5), (1.0, 1.2)), 1.0);
        assert_eq!(map_range(0.0, (0.0, 0.0), (3.0, 4.0)), 3.0);
    }
}
