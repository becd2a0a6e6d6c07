//! Second-order spring filter.
//!
//! The value is pulled towards `target` by `stiffness` and slowed by
//! `damping` (force model `-k·(x - target) - c·v` on a unit mass).
//! Integration is semi-implicit Euler over fixed substeps so large frame
//! gaps stay stable.

const MAX_SUBSTEP_SECS: f64 = 1.0 / 240.0;
const REST_DELTA: f64 = 1e-4;
const REST_SPEED: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    stiffness: f64,
    damping: f64,
    value: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness: stiffness.max(0.0),
            damping: damping.max(0.0),
            value: 0.0,
            velocity: 0.0,
            target: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Jump straight to `value` and stop.
    pub fn snap_to(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < REST_DELTA && self.velocity.abs() < REST_SPEED
    }

    /// Advance by `dt` seconds. Returns `true` while still in motion.
    pub fn step(&mut self, dt: f64) -> bool {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return false;
        }
        if dt.is_nan() || dt <= 0.0 {
            return true;
        }

        let substeps = (dt / MAX_SUBSTEP_SECS).ceil().max(1.0) as u32;
        let h = dt / f64::from(substeps);
        for _ in 0..substeps {
            let force = -self.stiffness * (self.value - self.target) - self.damping * self.velocity;
            self.velocity += force * h;
            self.value += self.velocity * h;
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return false;
        }
        true
    }
}
