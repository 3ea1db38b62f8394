//! Pulse-counting wheel encoder
//!
//! A single-channel encoder produces one edge per slot. The edge interrupt
//! increments a shared [`PulseCounter`]; the control loop owns a
//! [`PulseEncoder`] that turns the count into distance and velocity.
//!
//! Without a second channel the direction is unknown, so distance is
//! direction-insensitive and velocity is a magnitude.
//!
//! ```ignore
//! static LEFT_PULSES: PulseCounter = PulseCounter::new();
//!
//! // In the edge interrupt
//! LEFT_PULSES.record();
//!
//! // In the control loop
//! let mut left = PulseEncoder::new(&LEFT_PULSES, EncoderConfig::default());
//! left.sample(now_ms);
//! ```

use core::ops::Deref;

use duopass_core::traits::WheelEncoder;
use portable_atomic::{AtomicU32, Ordering};

/// Pulse count shared between the edge interrupt and the control loop
#[derive(Debug, Default)]
pub struct PulseCounter {
    pulses: AtomicU32,
}

impl PulseCounter {
    pub const fn new() -> Self {
        Self {
            pulses: AtomicU32::new(0),
        }
    }

    /// Record a single edge
    pub fn record(&self) {
        self.pulses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record several edges at once (timer capture, simulation)
    pub fn add(&self, pulses: u32) {
        self.pulses.fetch_add(pulses, Ordering::Relaxed);
    }

    /// Total edges since power-up (wraps)
    pub fn count(&self) -> u32 {
        self.pulses.load(Ordering::Relaxed)
    }
}

/// Encoder geometry and sampling
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Edges per wheel revolution
    pub pulses_per_rev: u32,
    /// Wheel circumference in mm
    pub wheel_circumference_mm: f32,
    /// Minimum velocity window in ms
    ///
    /// Must not exceed the regulator interval, since the regulator restarts
    /// the window after every update.
    pub sample_interval_ms: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            pulses_per_rev: 20,
            // 65 mm wheel
            wheel_circumference_mm: 204.2,
            sample_interval_ms: 50,
        }
    }
}

impl EncoderConfig {
    /// Distance per edge in mm
    pub fn mm_per_pulse(&self) -> f32 {
        if self.pulses_per_rev == 0 {
            0.0
        } else {
            self.wheel_circumference_mm / self.pulses_per_rev as f32
        }
    }
}

/// Wheel encoder over a shared pulse counter
///
/// `C` is any handle to the counter: `&'static PulseCounter` on target,
/// `Arc<PulseCounter>` on host.
pub struct PulseEncoder<C> {
    counter: C,
    config: EncoderConfig,
    /// Count at the last distance reset
    distance_base: u32,
    /// Count at the start of the velocity window
    window_base: u32,
    window_start_ms: Option<u32>,
    now_ms: u32,
    /// Latched velocity in m/s
    velocity: f32,
}

impl<C: Deref<Target = PulseCounter>> PulseEncoder<C> {
    pub fn new(counter: C, config: EncoderConfig) -> Self {
        let count = counter.count();
        Self {
            counter,
            config,
            distance_base: count,
            window_base: count,
            window_start_ms: None,
            now_ms: 0,
            velocity: 0.0,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Advance the encoder clock and latch a velocity once the window is full
    ///
    /// Call once per control tick, before the controller reads the encoder.
    pub fn sample(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
        let start = *self.window_start_ms.get_or_insert(now_ms);

        let elapsed = now_ms.wrapping_sub(start);
        if elapsed == 0 || elapsed < self.config.sample_interval_ms {
            return;
        }

        let count = self.counter.count();
        let pulses = count.wrapping_sub(self.window_base);
        // mm per ms is m/s
        self.velocity = pulses as f32 * self.config.mm_per_pulse() / elapsed as f32;
        self.window_base = count;
        self.window_start_ms = Some(now_ms);
    }
}

impl<C: Deref<Target = PulseCounter>> WheelEncoder for PulseEncoder<C> {
    fn velocity(&mut self) -> f32 {
        self.velocity
    }

    fn distance(&mut self) -> f32 {
        let pulses = self.counter.count().wrapping_sub(self.distance_base);
        pulses as f32 * self.config.mm_per_pulse()
    }

    fn reset_velocity(&mut self) {
        self.window_base = self.counter.count();
        self.window_start_ms = Some(self.now_ms);
    }

    fn reset_distance(&mut self) {
        self.distance_base = self.counter.count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        let diff = a - b;
        diff < 1e-4 && diff > -1e-4
    }

    fn config() -> EncoderConfig {
        EncoderConfig {
            pulses_per_rev: 20,
            wheel_circumference_mm: 200.0,
            sample_interval_ms: 50,
        }
    }

    #[test]
    fn test_distance() {
        let counter = PulseCounter::new();
        let mut encoder = PulseEncoder::new(&counter, config());

        counter.add(25);
        assert!(approx(encoder.distance(), 250.0));

        encoder.reset_distance();
        assert!(approx(encoder.distance(), 0.0));

        counter.record();
        assert!(approx(encoder.distance(), 10.0));
    }

    #[test]
    fn test_velocity_latched_per_window() {
        let counter = PulseCounter::new();
        let mut encoder = PulseEncoder::new(&counter, config());

        encoder.sample(0);
        counter.add(2);
        encoder.sample(30);
        // Window not yet full
        assert!(approx(encoder.velocity(), 0.0));

        encoder.sample(100);
        // 20 mm in 100 ms
        assert!(approx(encoder.velocity(), 0.2));
    }

    #[test]
    fn test_reset_velocity_restarts_window() {
        let counter = PulseCounter::new();
        let mut encoder = PulseEncoder::new(&counter, config());

        encoder.sample(0);
        counter.add(5);
        encoder.sample(50);
        assert!(approx(encoder.velocity(), 1.0));

        encoder.reset_velocity();
        counter.add(1);
        encoder.sample(100);
        // Only the pulse after the reset counts
        assert!(approx(encoder.velocity(), 0.2));
    }

    #[test]
    fn test_velocity_and_distance_independent() {
        let counter = PulseCounter::new();
        let mut encoder = PulseEncoder::new(&counter, config());

        encoder.sample(0);
        counter.add(10);
        encoder.sample(50);
        encoder.reset_velocity();

        assert!(approx(encoder.distance(), 100.0));
    }

    #[test]
    fn test_counter_wraps() {
        let counter = PulseCounter::new();
        counter.add(u32::MAX);
        let mut encoder = PulseEncoder::new(&counter, config());

        counter.add(3);
        assert!(approx(encoder.distance(), 30.0));
    }

    #[test]
    fn test_zero_pulses_per_rev() {
        let counter = PulseCounter::new();
        let mut encoder = PulseEncoder::new(
            &counter,
            EncoderConfig {
                pulses_per_rev: 0,
                ..config()
            },
        );
        counter.add(10);
        assert_eq!(encoder.distance(), 0.0);
    }
}
