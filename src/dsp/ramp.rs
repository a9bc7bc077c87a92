/*
Linear Parameter Ramp
=====================

Every continuous parameter in the engine (voice amplitude, pan, the root
frequency, master gain) moves through a `Ramp` instead of jumping. A fader
at 40% pushed to 90% does not snap; the value travels in a straight line to
the new target over the current fade time.

Vocabulary
----------

  start     Value when the current ramp began. Snapshotted on every retarget.

  current   Value the tick loop reads this tick.

  target    Where the ramp ends.

  elapsed   Seconds since the current ramp began.

  duration  Seconds the ramp takes from `start` to `target`.


The Shape
---------

    target ┤          ________
           │        ╱
           │      ╱
           │    ╱
    start  ┤__╱
           └──┬─────┬──────────→ time
            set   start + duration

The value is interpolated, not accumulated:

    current = start + (target - start) * elapsed / duration

so it lands exactly on `target` when the ramp completes, whatever the tick
size, and it never overshoots. Between start and target the value is
monotonic, which is what keeps a release free of bumps.


Retargeting
-----------

A new target arriving mid-ramp restarts the ramp FROM THE CURRENT VALUE.
A release during a fade-in therefore turns around where it is instead of
jumping to the old target (or to zero) first.

A zero duration applies the target immediately.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    start: f64,
    current: f64,
    target: f64,
    elapsed: f64,
    duration: f64,
}

impl Ramp {
    pub fn new(value: f64) -> Self {
        Self {
            start: value,
            current: value,
            target: value,
            elapsed: 0.0,
            duration: 0.0,
        }
    }

    /// Begin a ramp from the current value to `target` lasting `duration` seconds.
    pub fn set_target(&mut self, target: f64, duration: f64) {
        self.start = self.current;
        self.target = target;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);

        if self.duration <= 0.0 {
            self.current = target;
        }
    }

    /// Move to `value` with no ramp.
    pub fn jump(&mut self, value: f64) {
        *self = Self::new(value);
    }

    /// Advance the ramp by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if self.is_settled() {
            return;
        }

        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            self.current = self.target;
        } else {
            let progress = self.elapsed / self.duration;
            self.current = self.start + (self.target - self.start) * progress;
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// True once the current value has reached the target.
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_target_exactly() {
        let mut ramp = Ramp::new(0.0);
        ramp.set_target(1.0, 0.3);
        for _ in 0..7 {
            ramp.advance(0.05);
        }
        assert_eq!(ramp.current(), 1.0);
        assert!(ramp.is_settled());
    }

    #[test]
    fn interpolates_linearly() {
        let mut ramp = Ramp::new(100.0);
        ramp.set_target(200.0, 1.0);
        ramp.advance(0.25);
        assert!((ramp.current() - 125.0).abs() < 1e-9);
        ramp.advance(0.25);
        assert!((ramp.current() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_is_immediate() {
        let mut ramp = Ramp::new(0.2);
        ramp.set_target(0.9, 0.0);
        assert_eq!(ramp.current(), 0.9);
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut ramp = Ramp::new(0.0);
        ramp.set_target(1.0, 1.0);
        ramp.advance(0.5);
        let midway = ramp.current();

        ramp.set_target(0.0, 1.0);
        ramp.advance(0.0);
        assert!((ramp.current() - midway).abs() < 1e-9);

        let mut previous = ramp.current();
        for _ in 0..20 {
            ramp.advance(0.05);
            assert!(ramp.current() <= previous);
            previous = ramp.current();
        }
        assert_eq!(ramp.current(), 0.0);
    }
}
