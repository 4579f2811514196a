//! Small frame-time utilities used by game actors.
//!
//! Neither type reads a clock. The host passes the current time (seconds
//! since an arbitrary origin) or the frame delta, so behavior is
//! reproducible in tests.

use serde::{Deserialize, Serialize};

/// Rate limiter: fires at most once per `cooldown` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownTimer {
    cooldown: f64,
    last_time: f64,
}

impl CooldownTimer {
    /// Create a timer that has never fired.
    #[must_use]
    pub fn new(cooldown: f64) -> Self {
        Self {
            cooldown,
            last_time: f64::NEG_INFINITY,
        }
    }

    /// Cooldown in seconds.
    #[must_use]
    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    /// Seconds since the timer last fired (infinite if it never has).
    #[must_use]
    pub fn cooldown_time(&self, now: f64) -> f64 {
        now - self.last_time
    }

    /// Check whether the timer is still cooling down.
    #[must_use]
    pub fn is_active(&self, now: f64) -> bool {
        self.cooldown_time(now) <= self.cooldown
    }

    /// Fire if not cooling down. Returns `true` if the timer fired.
    pub fn trigger(&mut self, now: f64) -> bool {
        if self.is_active(now) {
            return false;
        }
        self.last_time = now;
        true
    }
}

/// Damped spring easing a value toward a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    /// Stiffness
    pub k: f32,
    /// Velocity damping
    pub damping: f32,
    /// Current value
    pub value: f32,
    /// Current velocity
    pub velocity: f32,
}

impl Spring {
    /// Create a spring at rest at `value`.
    #[must_use]
    pub fn new(k: f32, damping: f32, value: f32) -> Self {
        Self {
            k,
            damping,
            value,
            velocity: 0.0,
        }
    }

    /// Advance by `dt` seconds (semi-implicit Euler). Returns the new value.
    pub fn update(&mut self, target: f32, dt: f32) -> f32 {
        let force = -self.k * (self.value - target) - self.damping * self.velocity;
        self.velocity += force * dt;
        self.value += self.velocity * dt;
        self.value
    }
}
