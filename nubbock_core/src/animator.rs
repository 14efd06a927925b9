// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rotation cross-fade.
//!
//! A transform change fades a black overlay in, swaps the transform at full
//! black, then fades back out:
//!
//! ```text
//!   Idle ──request──► FadingOut(pending) ──level == steps──► FadingIn ──level == 0──► Idle
//!                        ▲        │ commit pending
//!                        └─request┘
//! ```
//!
//! Progress is counted in whole steps, so a fade of `steps` ticks commits on
//! exactly the `steps`-th tick. [`tick`](TransformAnimator::tick) is the
//! primitive; [`advance`](TransformAnimator::advance) converts elapsed host
//! time into ticks for embedders driving the fade from a clock.

use crate::config::FadeConfig;
use crate::geometry::OutputTransform;
use crate::time::HostTime;

/// Where the fade is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FadePhase {
    /// No overlay.
    #[default]
    Idle,
    /// Darkening toward `pending`.
    FadingOut {
        /// Transform committed when the overlay is fully opaque.
        pending: OutputTransform,
    },
    /// Brightening after the commit.
    FadingIn,
}

/// Result of one animation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing is animating.
    Idle,
    /// Opacity changed.
    Progress,
    /// The overlay reached full opacity and the pending transform became
    /// current.
    Committed(OutputTransform),
    /// The overlay reached zero and the animator went idle.
    Finished,
}

/// What a call to [`TransformAnimator::advance`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceSummary {
    /// Ticks run.
    pub ticks: u32,
    /// Transform committed during these ticks, if any.
    pub committed: Option<OutputTransform>,
    /// Whether the fade finished during these ticks.
    pub finished: bool,
}

/// Drives the fade-to-black rotation.
#[derive(Clone, Debug)]
pub struct TransformAnimator {
    config: FadeConfig,
    current: OutputTransform,
    phase: FadePhase,
    level: u32,
    last_tick: Option<HostTime>,
}

impl TransformAnimator {
    /// Creates an idle animator showing `current`.
    #[must_use]
    pub fn new(current: OutputTransform, config: FadeConfig) -> Self {
        Self {
            config,
            current,
            phase: FadePhase::Idle,
            level: 0,
            last_tick: None,
        }
    }

    /// The committed transform.
    #[must_use]
    pub fn current(&self) -> OutputTransform {
        self.current
    }

    /// The fade phase.
    #[must_use]
    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    /// Overlay opacity in `[0, 1]`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.level as f32 / self.config.steps.max(1) as f32
    }

    /// Whether ticks are needed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase != FadePhase::Idle
    }

    /// Starts a fade toward `target`.
    ///
    /// A request for the current transform does nothing. Any other request
    /// restarts from a transparent overlay, replacing a fade already in
    /// progress. Returns whether a fade started.
    pub fn request_transform(&mut self, target: OutputTransform) -> bool {
        if target == self.current {
            return false;
        }
        self.phase = FadePhase::FadingOut { pending: target };
        self.level = 0;
        self.last_tick = None;
        true
    }

    /// Advances the fade by one step.
    pub fn tick(&mut self) -> TickOutcome {
        let steps = self.config.steps.max(1);
        match self.phase {
            FadePhase::Idle => TickOutcome::Idle,
            FadePhase::FadingOut { pending } => {
                self.level = (self.level + 1).min(steps);
                if self.level == steps {
                    self.current = pending;
                    self.phase = FadePhase::FadingIn;
                    TickOutcome::Committed(pending)
                } else {
                    TickOutcome::Progress
                }
            }
            FadePhase::FadingIn => {
                self.level = self.level.saturating_sub(1);
                if self.level == 0 {
                    self.phase = FadePhase::Idle;
                    self.last_tick = None;
                    TickOutcome::Finished
                } else {
                    TickOutcome::Progress
                }
            }
        }
    }

    /// Runs one tick per whole tick period elapsed since the previous tick.
    ///
    /// The first call after a request only starts the clock.
    pub fn advance(&mut self, now: HostTime) -> AdvanceSummary {
        let mut summary = AdvanceSummary::default();
        if !self.is_active() {
            return summary;
        }
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return summary;
        };
        let period = self.config.tick_period;
        let due = now.saturating_duration_since(last).whole_periods(period);
        for _ in 0..due {
            summary.ticks += 1;
            match self.tick() {
                TickOutcome::Committed(t) => summary.committed = Some(t),
                TickOutcome::Finished => {
                    summary.finished = true;
                    return summary;
                }
                TickOutcome::Idle | TickOutcome::Progress => {}
            }
        }
        self.last_tick = last.checked_add(period.saturating_mul(due));
        summary
    }

    /// When the next tick is due, if animating and the clock has started.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        if !self.is_active() {
            return None;
        }
        self.last_tick?.checked_add(self.config.tick_period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Duration;

    fn animator() -> TransformAnimator {
        TransformAnimator::new(OutputTransform::Normal, FadeConfig::DEFAULT)
    }

    #[test]
    fn full_cycle_takes_twenty_ticks_each_way() {
        let mut a = animator();
        assert!(a.request_transform(OutputTransform::Rotate90));

        for _ in 0..19 {
            assert_eq!(a.tick(), TickOutcome::Progress);
            assert_eq!(a.current(), OutputTransform::Normal);
        }
        assert_eq!(a.tick(), TickOutcome::Committed(OutputTransform::Rotate90));
        assert_eq!(a.current(), OutputTransform::Rotate90);
        assert_eq!(a.phase(), FadePhase::FadingIn);
        assert_eq!(a.opacity(), 1.0);

        for _ in 0..19 {
            assert_eq!(a.tick(), TickOutcome::Progress);
        }
        assert_eq!(a.tick(), TickOutcome::Finished);
        assert_eq!(a.phase(), FadePhase::Idle);
        assert_eq!(a.opacity(), 0.0);
        assert_eq!(a.tick(), TickOutcome::Idle);
    }

    #[test]
    fn opacity_is_monotonic_and_commit_happens_once() {
        let mut a = animator();
        a.request_transform(OutputTransform::Rotate270);
        let mut prev = a.opacity();
        let mut commits = 0;
        while let FadePhase::FadingOut { .. } = a.phase() {
            if let TickOutcome::Committed(_) = a.tick() {
                commits += 1;
            }
            assert!(a.opacity() >= prev, "fading out never darkens less");
            prev = a.opacity();
        }
        while a.is_active() {
            assert!(!matches!(a.tick(), TickOutcome::Committed(_)));
            assert!(a.opacity() <= prev, "fading in never darkens more");
            prev = a.opacity();
        }
        assert_eq!(commits, 1);
    }

    #[test]
    fn same_transform_is_a_no_op() {
        let mut a = animator();
        assert!(!a.request_transform(OutputTransform::Normal));
        assert!(!a.is_active());
    }

    #[test]
    fn retarget_restarts_from_transparent() {
        let mut a = animator();
        a.request_transform(OutputTransform::Rotate90);
        for _ in 0..10 {
            a.tick();
        }
        assert!(a.opacity() > 0.4);

        a.request_transform(OutputTransform::Rotate180);
        assert_eq!(a.opacity(), 0.0);
        assert_eq!(
            a.phase(),
            FadePhase::FadingOut {
                pending: OutputTransform::Rotate180
            }
        );
        for _ in 0..19 {
            a.tick();
        }
        assert_eq!(a.tick(), TickOutcome::Committed(OutputTransform::Rotate180));
    }

    #[test]
    fn retarget_during_fade_in_starts_a_new_cycle() {
        let mut a = animator();
        a.request_transform(OutputTransform::Rotate90);
        for _ in 0..25 {
            a.tick();
        }
        assert_eq!(a.phase(), FadePhase::FadingIn);
        assert!(a.request_transform(OutputTransform::Normal));
        assert_eq!(a.opacity(), 0.0);
        assert_eq!(a.current(), OutputTransform::Rotate90);
    }

    #[test]
    fn advance_runs_whole_periods() {
        let mut a = animator();
        a.request_transform(OutputTransform::Rotate90);
        let t0 = HostTime(1_000_000_000);
        assert_eq!(a.advance(t0).ticks, 0, "first call starts the clock");
        assert_eq!(a.next_deadline(), Some(t0 + Duration::from_millis(20)));

        let s = a.advance(t0 + Duration::from_millis(59));
        assert_eq!(s.ticks, 2);
        assert_eq!(a.next_deadline(), Some(t0 + Duration::from_millis(60)));

        let s = a.advance(t0 + Duration::from_millis(400));
        assert_eq!(s.ticks, 18);
        assert_eq!(s.committed, Some(OutputTransform::Rotate90));

        let s = a.advance(t0 + Duration::from_millis(10_000));
        assert_eq!(s.ticks, 20);
        assert!(s.finished);
        assert_eq!(a.next_deadline(), None);
    }
}
