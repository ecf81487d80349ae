//! Spin Controller: one spin at a time, driven by clock ticks
//!
//! ```text
//!   Idle ──request_spin──▶ Locked(animating) ──tick (elapsed ≥ D)──▶ Idle + SpinOutcome
//!                               │
//!                               └──abandon / dispose / drop──▶ Idle, no outcome
//! ```
//!
//! The animation is a pure function of elapsed time; `tick()` samples the
//! injected clock and either reports progress or completes the spin.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::{SpinConfig, WheelConfig};
use crate::error::{WheelError, WheelResult};
use crate::random::{self, RandomSource};
use crate::segment::{Segment, SegmentCatalog};
use crate::selector::WeightedSelector;
use crate::target::{self, TargetRequest};

// ═══════════════════════════════════════════════════════════════════════════════
// ANIMATION TOKENS
// ═══════════════════════════════════════════════════════════════════════════════

/// Identifies one started spin animation, unique within its controller
pub type AnimationToken = u64;

// ═══════════════════════════════════════════════════════════════════════════════
// SPIN VALUES
// ═══════════════════════════════════════════════════════════════════════════════

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpinPhase {
    #[default]
    Idle,
    /// Animating; further spin requests are rejected
    Locked,
}

/// Handed out when a spin starts, so renderers can run their own animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinTicket {
    pub token: AnimationToken,
    pub segment_index: usize,
    pub start_rotation: f64,
    pub final_rotation: f64,
    pub duration_ms: u64,
    /// Selected through the forced entry point
    pub forced: bool,
}

/// Advisory animation state while locked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinProgress {
    pub token: AnimationToken,
    pub elapsed_ms: u64,
    /// Elapsed time over duration, 0.0 - 1.0
    pub time_fraction: f64,
    /// Easing applied to `time_fraction`
    pub eased_fraction: f64,
    /// Displayed absolute rotation
    pub rotation: f64,
    /// Degrees per second at this instant
    pub angular_velocity: f64,
}

/// Result of one completed spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub segment: Segment,
    pub segment_index: usize,
    /// New cumulative rotation
    pub final_rotation: f64,
    pub forced: bool,
    pub token: AnimationToken,
}

impl SpinOutcome {
    /// Landed on a "no prize" segment
    pub fn is_failure(&self) -> bool {
        self.segment.is_failure
    }
}

/// What a tick observed
#[derive(Debug, Clone, PartialEq)]
pub enum SpinTick {
    /// No spin in flight
    Idle,
    Animating(SpinProgress),
    /// The spin finished on this tick; emitted once per spin
    Completed(SpinOutcome),
}

#[derive(Debug, Clone, Copy)]
struct ActiveSpin {
    ticket: SpinTicket,
    started_at_ms: u64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTROLLER
// ═══════════════════════════════════════════════════════════════════════════════

/// Spin state machine for a single wheel (one per player).
pub struct SpinController<R: RandomSource, C: Clock> {
    catalog: SegmentCatalog,
    selector: WeightedSelector,
    config: SpinConfig,
    rng: R,
    clock: C,
    /// Unbounded, never reduced modulo 360
    cumulative_rotation: f64,
    active: Option<ActiveSpin>,
    spins_completed: u64,
    next_token: AnimationToken,
}

impl<R: RandomSource, C: Clock> SpinController<R, C> {
    /// Create a controller at rotation 0
    pub fn new(catalog: SegmentCatalog, config: SpinConfig, rng: R, clock: C) -> WheelResult<Self> {
        config.validate(catalog.len())?;
        let selector = WeightedSelector::for_catalog(&catalog)?;

        Ok(Self {
            catalog,
            selector,
            config,
            rng,
            clock,
            cumulative_rotation: 0.0,
            active: None,
            spins_completed: 0,
            next_token: 1,
        })
    }

    /// Create from a wheel document
    pub fn from_config(config: &WheelConfig, rng: R, clock: C) -> WheelResult<Self> {
        Self::new(config.catalog()?, config.spin.clone(), rng, clock)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn phase(&self) -> SpinPhase {
        if self.active.is_some() {
            SpinPhase::Locked
        } else {
            SpinPhase::Idle
        }
    }

    pub fn is_locked(&self) -> bool {
        self.active.is_some()
    }

    /// Rotation after the last completed spin
    pub fn cumulative_rotation(&self) -> f64 {
        self.cumulative_rotation
    }

    pub fn catalog(&self) -> &SegmentCatalog {
        &self.catalog
    }

    pub fn selector(&self) -> &WeightedSelector {
        &self.selector
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    pub fn spins_completed(&self) -> u64 {
        self.spins_completed
    }

    /// Ticket of the spin in flight
    pub fn current_ticket(&self) -> Option<SpinTicket> {
        self.active.map(|a| a.ticket)
    }

    /// Whether `token` belongs to the spin in flight
    pub fn is_current(&self, token: AnimationToken) -> bool {
        self.active.is_some_and(|a| a.ticket.token == token)
    }

    /// Replace spin constants; only while idle
    pub fn set_config(&mut self, config: SpinConfig) -> WheelResult<()> {
        if self.is_locked() {
            return Err(WheelError::AlreadySpinning);
        }
        config.validate(self.catalog.len())?;
        self.config = config;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN REQUESTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Start a weighted-random spin
    pub fn request_spin(&mut self) -> WheelResult<SpinTicket> {
        self.ensure_idle()?;
        let draw = self.rng.next_unit();
        let index = self.selector.select(draw)?;
        self.start(index, false)
    }

    /// Start a spin that lands on `index` regardless of weights
    pub fn request_spin_forced(&mut self, index: usize) -> WheelResult<SpinTicket> {
        self.ensure_idle()?;
        let index = self.selector.select_forced(index)?;
        self.start(index, true)
    }

    fn ensure_idle(&self) -> WheelResult<()> {
        match self.active {
            Some(active) => {
                log::debug!(
                    "Spin request ignored, spin {} still animating",
                    active.ticket.token
                );
                Err(WheelError::AlreadySpinning)
            }
            None => Ok(()),
        }
    }

    fn start(&mut self, segment_index: usize, forced: bool) -> WheelResult<SpinTicket> {
        let max_jitter = self.config.jitter_degrees;
        let jitter = random::symmetric(self.rng.next_unit(), max_jitter).clamp(-max_jitter, max_jitter);

        let request = TargetRequest::new(
            segment_index,
            self.catalog.len(),
            self.cumulative_rotation,
            self.config.extra_full_turns,
            jitter,
        )
        .with_reference_angle(self.config.reference_angle)
        .with_safety_margin(self.config.safety_margin_degrees);
        let target = target::compute_target(&request)?;

        let token = self.next_token;
        self.next_token += 1;

        let ticket = SpinTicket {
            token,
            segment_index,
            start_rotation: self.cumulative_rotation,
            final_rotation: target.final_rotation,
            duration_ms: self.config.duration_ms,
            forced,
        };
        self.active = Some(ActiveSpin {
            ticket,
            started_at_ms: self.clock.now_ms(),
        });

        log::debug!(
            "Spin {} started: segment {} ('{}'){}, {:.2}° → {:.2}° over {} ms",
            ticket.token,
            segment_index,
            self.catalog.get(segment_index).map_or("?", |s| s.label.as_str()),
            if forced { " [forced]" } else { "" },
            ticket.start_rotation,
            ticket.final_rotation,
            ticket.duration_ms
        );

        Ok(ticket)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ANIMATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Advisory rotation at the current clock time
    pub fn progress(&self) -> Option<SpinProgress> {
        self.active
            .as_ref()
            .map(|active| self.progress_at(active, self.clock.now_ms()))
    }

    /// Displayed rotation: in-flight angle while locked, otherwise the resting angle
    pub fn displayed_rotation(&self) -> f64 {
        self.progress()
            .map_or(self.cumulative_rotation, |p| p.rotation)
    }

    fn progress_at(&self, active: &ActiveSpin, now_ms: u64) -> SpinProgress {
        let ticket = &active.ticket;
        let elapsed_ms = now_ms.saturating_sub(active.started_at_ms);
        let time_fraction = if ticket.duration_ms == 0 {
            1.0
        } else {
            (elapsed_ms as f64 / ticket.duration_ms as f64).min(1.0)
        };

        let travel = ticket.final_rotation - ticket.start_rotation;
        let eased_fraction = self.config.easing.evaluate(time_fraction);
        let rotation = if time_fraction >= 1.0 {
            ticket.final_rotation
        } else {
            ticket.start_rotation + travel * eased_fraction
        };
        let angular_velocity = if ticket.duration_ms == 0 || time_fraction >= 1.0 {
            0.0
        } else {
            travel * self.config.easing.slope(time_fraction) * 1000.0 / ticket.duration_ms as f64
        };

        SpinProgress {
            token: ticket.token,
            elapsed_ms,
            time_fraction,
            eased_fraction,
            rotation,
            angular_velocity,
        }
    }

    /// Advance against the clock; completes the spin once the duration has elapsed
    pub fn tick(&mut self) -> SpinTick {
        let Some(active) = self.active else {
            return SpinTick::Idle;
        };

        let now = self.clock.now_ms();
        if now.saturating_sub(active.started_at_ms) < active.ticket.duration_ms {
            return SpinTick::Animating(self.progress_at(&active, now));
        }

        self.active = None;
        let ticket = active.ticket;
        self.cumulative_rotation = ticket.final_rotation;
        self.spins_completed += 1;

        let segment = self.catalog.segments()[ticket.segment_index].clone();
        log::info!(
            "Spin {} landed on '{}' (id {}) at {:.2}°",
            ticket.token,
            segment.label,
            segment.id,
            ticket.final_rotation
        );

        SpinTick::Completed(SpinOutcome {
            segment,
            segment_index: ticket.segment_index,
            final_rotation: ticket.final_rotation,
            forced: ticket.forced,
            token: ticket.token,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TEARDOWN
    // ═══════════════════════════════════════════════════════════════════════════

    /// Drop the in-flight animation without emitting an outcome.
    ///
    /// Rotation stays at the last completed spin; the token is no longer current.
    pub fn abandon(&mut self) -> Option<AnimationToken> {
        let active = self.active.take()?;
        log::warn!(
            "Spin {} abandoned before completion, no outcome emitted",
            active.ticket.token
        );
        Some(active.ticket.token)
    }

    /// Tear the controller down, abandoning any spin in flight
    pub fn dispose(mut self) -> Option<AnimationToken> {
        self.abandon()
    }
}

impl<R: RandomSource, C: Clock> Drop for SpinController<R, C> {
    fn drop(&mut self) {
        self.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::normalize360;
    use crate::clock::ManualClock;
    use crate::random::{RngSource, ScriptedSource};
    use crate::target::segment_under_pointer;
    use approx::assert_relative_eq;

    fn controller(
        draws: impl IntoIterator<Item = f64>,
    ) -> (SpinController<ScriptedSource, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let ctl = SpinController::new(
            SegmentCatalog::lucky_spin(),
            SpinConfig::dramatic(),
            ScriptedSource::new(draws),
            clock.clone(),
        )
        .unwrap();
        (ctl, clock)
    }

    fn finish(ctl: &mut SpinController<impl RandomSource, ManualClock>, clock: &ManualClock) -> SpinOutcome {
        clock.advance(ctl.config().duration_ms);
        match ctl.tick() {
            SpinTick::Completed(outcome) => outcome,
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_zonk_scenario() {
        // 0.90 selects ZONK, 0.5 gives zero jitter
        let (mut ctl, clock) = controller([0.90, 0.5]);
        let ticket = ctl.request_spin().unwrap();

        assert_eq!(ticket.segment_index, 6);
        assert!(!ticket.forced);
        assert_relative_eq!(ticket.final_rotation, 15.0 * 360.0 + 100.0);
        assert_eq!(ctl.phase(), SpinPhase::Locked);

        let outcome = finish(&mut ctl, &clock);
        assert_eq!(outcome.segment.label, "ZONK");
        assert!(outcome.is_failure());
        assert_relative_eq!(outcome.final_rotation, 5500.0);
        assert_relative_eq!(ctl.cumulative_rotation(), 5500.0);
        assert_eq!(ctl.phase(), SpinPhase::Idle);
        assert_eq!(ctl.spins_completed(), 1);
    }

    #[test]
    fn test_already_spinning() {
        let (mut ctl, clock) = controller([0.90, 0.5, 0.01, 0.5]);
        ctl.request_spin().unwrap();
        clock.advance(3_000);

        assert_eq!(ctl.request_spin(), Err(WheelError::AlreadySpinning));
        assert_eq!(ctl.request_spin_forced(0), Err(WheelError::AlreadySpinning));
        assert_eq!(ctl.cumulative_rotation(), 0.0);
        assert!(ctl.is_locked());
    }

    #[test]
    fn test_outcome_emitted_once() {
        let (mut ctl, clock) = controller([0.5, 0.5]);
        ctl.request_spin().unwrap();

        clock.advance(9_999);
        assert!(matches!(ctl.tick(), SpinTick::Animating(_)));
        clock.advance(1);
        assert!(matches!(ctl.tick(), SpinTick::Completed(_)));
        clock.advance(5_000);
        assert_eq!(ctl.tick(), SpinTick::Idle);
        assert_eq!(ctl.spins_completed(), 1);
    }

    #[test]
    fn test_progress_monotonic_and_exact_end() {
        let (mut ctl, clock) = controller([0.3, 0.9]);
        let ticket = ctl.request_spin().unwrap();

        let mut last = ticket.start_rotation;
        for _ in 0..99 {
            clock.advance(100);
            match ctl.tick() {
                SpinTick::Animating(p) => {
                    assert!(p.rotation >= last);
                    assert!(p.rotation <= ticket.final_rotation);
                    assert!(p.angular_velocity >= 0.0);
                    assert_eq!(p.token, ticket.token);
                    last = p.rotation;
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        clock.advance(100);
        let SpinTick::Completed(outcome) = ctl.tick() else {
            panic!("spin should complete at exactly D");
        };
        assert_eq!(outcome.final_rotation, ticket.final_rotation);
    }

    #[test]
    fn test_sequential_spins_strictly_increase() {
        let clock = ManualClock::new();
        let mut ctl = SpinController::new(
            SegmentCatalog::lucky_spin(),
            SpinConfig::dramatic(),
            RngSource::seeded(17),
            clock.clone(),
        )
        .unwrap();

        let mut previous = ctl.cumulative_rotation();
        for _ in 0..25 {
            let ticket = ctl.request_spin().unwrap();
            assert!(ticket.final_rotation > previous);
            assert_eq!(
                segment_under_pointer(ticket.final_rotation, 9, 0.0).unwrap(),
                ticket.segment_index
            );

            let outcome = finish(&mut ctl, &clock);
            assert!(outcome.final_rotation > previous);
            previous = outcome.final_rotation;
        }
        assert_eq!(ctl.spins_completed(), 25);
    }

    #[test]
    fn test_forced_spin_every_segment() {
        let (mut ctl, clock) = controller([]);
        for k in 0..9 {
            let ticket = ctl.request_spin_forced(k).unwrap();
            assert!(ticket.forced);
            let outcome = finish(&mut ctl, &clock);
            assert_eq!(outcome.segment_index, k);
            assert_eq!(segment_under_pointer(outcome.final_rotation, 9, 0.0).unwrap(), k);
        }
        assert!(matches!(
            ctl.request_spin_forced(9),
            Err(WheelError::InvalidInput(_))
        ));
        assert!(!ctl.is_locked());
    }

    #[test]
    fn test_bad_draw_rejected_without_locking() {
        let (mut ctl, _clock) = controller([1.5]);
        assert!(matches!(ctl.request_spin(), Err(WheelError::InvalidInput(_))));
        assert_eq!(ctl.phase(), SpinPhase::Idle);
        assert_eq!(ctl.cumulative_rotation(), 0.0);
    }

    #[test]
    fn test_abandon_emits_nothing() {
        let (mut ctl, clock) = controller([0.9, 0.5]);
        let ticket = ctl.request_spin().unwrap();
        assert!(ctl.is_current(ticket.token));

        clock.advance(4_000);
        assert_eq!(ctl.abandon(), Some(ticket.token));
        assert!(!ctl.is_current(ticket.token));
        assert_eq!(ctl.cumulative_rotation(), 0.0);

        clock.advance(10_000);
        assert_eq!(ctl.tick(), SpinTick::Idle);
        assert_eq!(ctl.spins_completed(), 0);
        assert_eq!(ctl.abandon(), None);
    }

    #[test]
    fn test_dispose_mid_spin() {
        let (mut ctl, _clock) = controller([0.9, 0.5]);
        let ticket = ctl.request_spin().unwrap();
        assert_eq!(ctl.dispose(), Some(ticket.token));
    }

    #[test]
    fn test_zero_duration_completes_on_first_tick() {
        let mut ctl = SpinController::new(
            SegmentCatalog::lucky_spin(),
            SpinConfig::studio(),
            ScriptedSource::new([0.95, 0.5]),
            ManualClock::new(),
        )
        .unwrap();
        let ticket = ctl.request_spin().unwrap();
        assert_relative_eq!(ticket.final_rotation, 360.0 + 100.0);
        let progress = ctl.progress().unwrap();
        assert_eq!(progress.rotation, ticket.final_rotation);
        assert!(matches!(ctl.tick(), SpinTick::Completed(_)));
        assert_relative_eq!(normalize360(ctl.cumulative_rotation()), 100.0);
    }

    #[test]
    fn test_set_config_only_when_idle() {
        let (mut ctl, clock) = controller([0.9, 0.5]);
        ctl.request_spin().unwrap();
        assert_eq!(
            ctl.set_config(SpinConfig::quick()),
            Err(WheelError::AlreadySpinning)
        );
        finish(&mut ctl, &clock);
        ctl.set_config(SpinConfig::quick()).unwrap();
        assert_eq!(ctl.config().duration_ms, 4_000);
    }

    #[test]
    fn test_displayed_rotation() {
        let (mut ctl, clock) = controller([0.9, 0.5]);
        assert_eq!(ctl.displayed_rotation(), 0.0);
        ctl.request_spin().unwrap();
        clock.advance(5_000);
        let mid = ctl.displayed_rotation();
        assert!(mid > 0.0 && mid < 5500.0);
    }

    #[test]
    fn test_tokens_are_per_controller() {
        let (mut a, clock_a) = controller([0.9, 0.5]);
        let (mut b, _clock_b) = controller([0.9, 0.5]);

        let first = a.request_spin().unwrap();
        assert_eq!(first.token, 1);
        assert_eq!(b.request_spin().unwrap().token, 1);

        a.abandon();
        let second = a.request_spin().unwrap();
        assert_eq!(second.token, 2);
        assert!(!a.is_current(first.token));

        let outcome = finish(&mut a, &clock_a);
        assert_eq!(outcome.token, 2);
        assert_eq!(a.request_spin().unwrap().token, 3);
    }

    #[test]
    fn test_rejects_invalid_spin_config() {
        let mut config = SpinConfig::dramatic();
        config.safety_margin_degrees = 45.0;
        let result = SpinController::new(
            SegmentCatalog::lucky_spin(),
            config,
            ScriptedSource::constant(0.5),
            ManualClock::new(),
        );
        assert!(matches!(result, Err(WheelError::InvalidConfig(_))));
    }
}
