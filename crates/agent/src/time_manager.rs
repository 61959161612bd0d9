//! Match-wide time budgeting.
//!
//! The runner grants a fixed total budget for the whole match. After each
//! tick the remaining budget is spread evenly over the remaining ticks, and
//! the search consults the result between candidates.

use crate::config::TimeConfig;
use std::time::Instant;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct TimeManager {
    settings: TimeConfig,
    total_ticks: u32,
    total_millis: f64,
    elapsed_millis: f64,
    ticks_passed: u32,
    millis_per_tick: f64,
    /// Start of the running tick; `None` between ticks.
    tick_started: Option<Instant>,
}

impl TimeManager {
    pub fn new(total_ticks: u32, settings: &TimeConfig) -> Self {
        Self {
            total_ticks,
            total_millis: f64::from(total_ticks) * settings.millis_per_tick,
            elapsed_millis: 0.0,
            ticks_passed: 0,
            millis_per_tick: (settings.millis_per_tick - settings.overhead_millis)
                .clamp(0.0, settings.max_millis_per_tick),
            tick_started: None,
            settings: settings.clone(),
        }
    }

    pub fn tick_started(&mut self) {
        self.tick_started = Some(Instant::now());
    }

    /// Charge the wall time of the running tick.
    pub fn tick_finished(&mut self) {
        let spent = self.millis_in_tick();
        self.tick_started = None;
        self.record_tick(spent);
    }

    /// Charge `millis` plus the fixed overhead and rebalance the budget.
    pub fn record_tick(&mut self, millis: f64) {
        self.elapsed_millis += millis + self.settings.overhead_millis;
        self.ticks_passed += 1;
        self.millis_per_tick = if self.ticks_passed >= self.total_ticks {
            0.0
        } else {
            let left = self.total_millis - self.elapsed_millis;
            let ticks_left = f64::from(self.total_ticks - self.ticks_passed);
            (left / ticks_left).clamp(0.0, self.settings.max_millis_per_tick)
        };
        if self.is_globally_expired() {
            warn!(
                elapsed = self.elapsed_millis,
                total = self.total_millis,
                "match time budget exhausted"
            );
        }
    }

    /// Milliseconds spent in the running tick so far.
    pub fn millis_in_tick(&self) -> f64 {
        self.tick_started
            .map(|start| start.elapsed().as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    #[inline]
    pub fn millis_per_tick(&self) -> f64 {
        self.millis_per_tick
    }

    #[inline]
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed_millis
    }

    #[inline]
    pub fn ticks_passed(&self) -> u32 {
        self.ticks_passed
    }

    /// Too little time for search; use the heuristic.
    pub fn be_cheap(&self) -> bool {
        self.millis_per_tick <= self.settings.cheap_millis_per_tick
    }

    /// Plenty of time; search wider and deeper.
    pub fn be_thorough(&self) -> bool {
        self.millis_per_tick >= self.settings.thorough_millis_per_tick
    }

    /// The running tick used up its share. Never true between ticks.
    pub fn is_tick_expired(&self) -> bool {
        self.tick_started.is_some() && self.millis_in_tick() >= self.millis_per_tick
    }

    pub fn is_globally_expired(&self) -> bool {
        self.elapsed_millis > self.total_millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_budget_leaves_overhead() {
        let tm = TimeManager::new(100, &TimeConfig::default());
        assert_eq!(tm.millis_per_tick(), 22.0);
        assert!(!tm.be_cheap());
        assert!(!tm.be_thorough());
        assert!(!tm.is_tick_expired());
    }

    #[test]
    fn test_proportional_use_reaches_zero_at_end() {
        let settings = TimeConfig::default();
        let ticks = 100;
        let mut tm = TimeManager::new(ticks, &settings);
        for _ in 0..ticks {
            tm.record_tick(settings.millis_per_tick - settings.overhead_millis);
            assert!(tm.millis_per_tick() <= settings.max_millis_per_tick);
            if tm.ticks_passed() < ticks {
                assert_eq!(tm.millis_per_tick(), settings.millis_per_tick);
            }
        }
        assert_eq!(tm.ticks_passed(), ticks);
        assert_eq!(tm.millis_per_tick(), 0.0);
        assert!(!tm.is_globally_expired());
    }

    #[test]
    fn test_budget_clamped_to_max() {
        let settings = TimeConfig {
            max_millis_per_tick: 30.0,
            ..TimeConfig::default()
        };
        let mut tm = TimeManager::new(10, &settings);
        // Nearly free ticks pile up unused budget.
        for _ in 0..8 {
            tm.record_tick(0.0);
            assert!(tm.millis_per_tick() <= 30.0);
        }
        assert_eq!(tm.millis_per_tick(), 30.0);
        assert!(!tm.be_thorough());
    }

    #[test]
    fn test_saved_budget_turns_thorough() {
        let settings = TimeConfig::default();
        let mut tm = TimeManager::new(10, &settings);
        for _ in 0..4 {
            tm.record_tick(0.0);
            assert!(!tm.be_thorough());
        }
        // 230 ms left over 5 ticks.
        tm.record_tick(0.0);
        assert_eq!(tm.millis_per_tick(), 46.0);
        assert!(tm.be_thorough());
        assert!(!tm.be_cheap());

        tm.record_tick(150.0);
        assert_eq!(tm.millis_per_tick(), 19.5);
        assert!(!tm.be_thorough());
    }

    #[test]
    fn test_overrun_degrades_then_expires() {
        let settings = TimeConfig::default();
        let mut tm = TimeManager::new(10, &settings);
        tm.record_tick(300.0);
        assert!(tm.be_cheap());
        assert!(tm.is_globally_expired());
        assert_eq!(tm.millis_per_tick(), 0.0);
    }

    #[test]
    fn test_running_tick_expires() {
        let settings = TimeConfig {
            millis_per_tick: 2.0,
            overhead_millis: 2.0,
            ..TimeConfig::default()
        };
        let mut tm = TimeManager::new(10, &settings);
        assert_eq!(tm.millis_per_tick(), 0.0);
        tm.tick_started();
        assert!(tm.is_tick_expired());
        tm.tick_finished();
        assert!(!tm.is_tick_expired());
    }
}
