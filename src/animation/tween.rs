use super::ease::Easing;
use std::time::{Duration, Instant};

/// One scheduled property animation: drive `target` from `from` to `to` over
/// `duration`, starting `delay` after it was added to the timeline.
#[derive(Debug, Clone, Copy)]
pub struct TweenRecord<K> {
    pub target: K,
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
}

impl<K> TweenRecord<K> {
    pub fn new(target: K, from: f32, to: f32, duration: Duration, easing: Easing) -> Self {
        Self { target, from, to, duration, easing, delay: Duration::ZERO }
    }

    /// Value at `elapsed` since the record was scheduled (delay included).
    /// `None` while the delay is still running.
    pub fn value_at(&self, elapsed: Duration) -> Option<f32> {
        let active = elapsed.checked_sub(self.delay)?;
        let t = if self.duration.is_zero() {
            1.0
        } else {
            active.as_secs_f32() / self.duration.as_secs_f32()
        };
        Some(self.from + (self.to - self.from) * self.easing.apply(t))
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.delay + self.duration
    }
}

struct Scheduled<K> {
    record: TweenRecord<K>,
    added_at: Instant,
}

/// Result of one timeline step: every live value plus the targets whose
/// record ran to completion this step (their final value is included in `values`).
#[derive(Debug)]
pub struct Sample<K> {
    pub values: Vec<(K, f32)>,
    pub completed: Vec<K>,
}

impl<K: PartialEq> Sample<K> {
    pub fn value_of(&self, target: &K) -> Option<f32> {
        self.values.iter().find(|(k, _)| k == target).map(|(_, v)| *v)
    }

    pub fn completed(&self, target: &K) -> bool {
        self.completed.contains(target)
    }
}

/// General-purpose tween scheduler. A target has at most one live record:
/// adding a new record for a target replaces the old one.
pub struct Timeline<K> {
    scheduled: Vec<Scheduled<K>>,
}

impl<K: Copy + PartialEq> Timeline<K> {
    pub fn new() -> Self {
        Self { scheduled: Vec::new() }
    }

    pub fn add(&mut self, record: TweenRecord<K>, now: Instant) {
        self.kill_tweens_of(record.target);
        self.scheduled.push(Scheduled { record, added_at: now });
    }

    /// Drop every pending or in-flight record for `target`.
    /// Returns true when something was cancelled.
    pub fn kill_tweens_of(&mut self, target: K) -> bool {
        let before = self.scheduled.len();
        self.scheduled.retain(|s| s.record.target != target);
        before != self.scheduled.len()
    }

    pub fn clear(&mut self) {
        self.scheduled.clear();
    }

    /// Advance to `now`, returning current values and retiring finished records.
    pub fn sample(&mut self, now: Instant) -> Sample<K> {
        let mut values = Vec::with_capacity(self.scheduled.len());
        let mut completed = Vec::new();
        self.scheduled.retain(|s| {
            let elapsed = now.saturating_duration_since(s.added_at);
            if let Some(v) = s.record.value_at(elapsed) {
                values.push((s.record.target, v));
            }
            if s.record.is_finished(elapsed) {
                completed.push(s.record.target);
                false
            } else {
                true
            }
        });
        Sample { values, completed }
    }
}

impl<K: Copy + PartialEq> Default for Timeline<K> {
    fn default() -> Self {
        Self::new()
    }
}
