//! Smile gate state machine.
//!
//! Turns a stream of per-frame happiness scores into a single capture
//! trigger. A smiling frame adds one unit of credit, any other frame
//! takes one away (never below zero). The gate fires the first time
//! credit reaches the configured run length and ignores everything
//! after that.

use super::{FrameScore, GateConfig};
use crate::capture::ConfigError;

/// Outcome of observing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    /// Keep polling.
    None,
    /// Sustained smile observed; take the photo.
    Capture,
}

/// Lifecycle phase of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// Accumulating credit.
    Waiting,
    /// Terminal. All further input is ignored.
    Triggered,
}

/// Mutable gate state. Only [`SmileGate::observe`] changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateState {
    /// Qualifying-frame credit, `0..=required_consecutive_frames`.
    pub consecutive_credit: u32,
}

/// Debounces happiness scores into a one-shot capture trigger.
#[derive(Debug, Clone)]
pub struct SmileGate {
    config: GateConfig,
    state: GateState,
    phase: GatePhase,
    last_happiness: f64,
    frames_observed: u64,
}

impl SmileGate {
    /// Creates a gate in the waiting phase with zero credit.
    ///
    /// Rejects configs that could never fire or could push credit past
    /// the run length, such as a zero run length or a threshold of 1.
    pub fn new(config: GateConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: GateConfig) -> Self {
        Self {
            config,
            state: GateState::default(),
            phase: GatePhase::Waiting,
            last_happiness: 0.0,
            frames_observed: 0,
        }
    }

    /// Feeds one frame score through the state machine.
    pub fn observe(&mut self, score: &FrameScore) -> GateAction {
        if self.phase == GatePhase::Triggered {
            return GateAction::None;
        }

        self.frames_observed += 1;
        self.last_happiness = if score.has_face { score.happiness } else { 0.0 };

        if !score.has_face || !self.config.qualifies(score.happiness) {
            self.state.consecutive_credit = self.state.consecutive_credit.saturating_sub(1);
            tracing::trace!(
                credit = self.state.consecutive_credit,
                happiness = score.happiness,
                has_face = score.has_face,
                "Smile credit decayed"
            );
            return GateAction::None;
        }

        self.state.consecutive_credit += 1;
        tracing::trace!(
            credit = self.state.consecutive_credit,
            happiness = score.happiness,
            "Smile credit earned"
        );

        if self.state.consecutive_credit >= self.config.required_consecutive_frames {
            self.phase = GatePhase::Triggered;
            tracing::info!(
                credit = self.state.consecutive_credit,
                frames = self.frames_observed,
                timestamp_ms = score.timestamp_ms,
                "Sustained smile detected"
            );
            return GateAction::Capture;
        }

        GateAction::None
    }

    /// Latest happiness in `[0, 1]`, for a live meter. Zero with no face.
    pub fn progress_fraction(&self) -> f64 {
        self.last_happiness.clamp(0.0, 1.0)
    }

    /// Current credit.
    pub fn credit(&self) -> u32 {
        self.state.consecutive_credit
    }

    /// Snapshot of the mutable state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// True once the capture has fired.
    pub fn is_triggered(&self) -> bool {
        self.phase == GatePhase::Triggered
    }

    /// Frames observed before the trigger.
    pub fn frames_observed(&self) -> u64 {
        self.frames_observed
    }

    /// Thresholds this gate was built with.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

impl Default for SmileGate {
    fn default() -> Self {
        Self::with_valid_config(GateConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed(gate: &mut SmileGate, scores: &[f64]) -> (Vec<GateAction>, Vec<u32>) {
        scores
            .iter()
            .enumerate()
            .map(|(i, &h)| {
                let action = gate.observe(&FrameScore::face(h, i as u64 * 100));
                (action, gate.credit())
            })
            .unzip()
    }

    #[test]
    fn test_starts_waiting() {
        let gate = SmileGate::default();
        assert_eq!(gate.phase(), GatePhase::Waiting);
        assert_eq!(gate.credit(), 0);
        assert_eq!(gate.progress_fraction(), 0.0);
    }

    #[test]
    fn test_single_bad_frame_costs_one_credit() {
        let mut gate = SmileGate::new(GateConfig::new(0.8, 5)).unwrap();
        let (actions, credits) = feed(&mut gate, &[0.9, 0.9, 0.9, 0.9, 0.3, 0.9, 0.9]);

        assert_eq!(credits, vec![1, 2, 3, 4, 3, 4, 5]);
        assert_eq!(actions[..6], [GateAction::None; 6]);
        assert_eq!(actions[6], GateAction::Capture);
    }

    #[test]
    fn test_fires_when_credit_first_reaches_run_length() {
        let mut gate = SmileGate::new(GateConfig::new(0.8, 3)).unwrap();
        let (actions, credits) = feed(&mut gate, &[0.9, 0.9, 0.5, 0.9, 0.9, 0.9]);

        assert_eq!(
            actions,
            vec![
                GateAction::None,
                GateAction::None,
                GateAction::None,
                GateAction::None,
                GateAction::Capture,
                GateAction::None,
            ]
        );
        // The sixth score arrives after the trigger and is ignored
        assert_eq!(credits, vec![1, 2, 1, 2, 3, 3]);
        assert_eq!(gate.frames_observed(), 5);
    }

    #[test]
    fn test_no_face_decays() {
        let mut gate = SmileGate::new(GateConfig::new(0.8, 5)).unwrap();
        feed(&mut gate, &[0.95, 0.95]);

        gate.observe(&FrameScore::no_face(300));
        assert_eq!(gate.credit(), 1);
        assert_eq!(gate.progress_fraction(), 0.0);

        gate.observe(&FrameScore::no_face(400));
        gate.observe(&FrameScore::no_face(500));
        assert_eq!(gate.credit(), 0);
    }

    #[test]
    fn test_score_at_threshold_does_not_qualify() {
        let mut gate = SmileGate::new(GateConfig::new(0.8, 1)).unwrap();
        assert_eq!(gate.observe(&FrameScore::face(0.8, 0)), GateAction::None);
        assert_eq!(gate.observe(&FrameScore::face(0.81, 100)), GateAction::Capture);
    }

    #[test]
    fn test_triggered_gate_ignores_input() {
        let mut gate = SmileGate::new(GateConfig::new(0.8, 2)).unwrap();
        feed(&mut gate, &[0.9, 0.9]);
        assert!(gate.is_triggered());

        let progress = gate.progress_fraction();
        let (actions, credits) = feed(&mut gate, &[0.99, 0.1, 0.99]);

        assert!(actions.iter().all(|a| *a == GateAction::None));
        assert!(credits.iter().all(|c| *c == 2));
        assert_eq!(gate.progress_fraction(), progress);
    }

    #[test]
    fn test_progress_tracks_latest_score() {
        let mut gate = SmileGate::default();
        gate.observe(&FrameScore::face(0.42, 0));
        assert!((gate.progress_fraction() - 0.42).abs() < 1e-12);

        gate.observe(&FrameScore::face(0.9, 100));
        assert!((gate.progress_fraction() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(matches!(
            SmileGate::new(GateConfig::new(0.8, 0)),
            Err(ConfigError::InvalidFrameCount)
        ));
        assert!(matches!(
            SmileGate::new(GateConfig::new(1.0, 5)),
            Err(ConfigError::InvalidThreshold(_))
        ));
        assert!(matches!(
            SmileGate::new(GateConfig::new(f64::NAN, 5)),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    fn score_strategy() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![
            1 => Just(None::<f64>),
            4 => (0.0f64..=1.0).prop_map(Some),
        ]
    }

    proptest! {
        #[test]
        fn prop_captures_at_most_once(
            required in 1u32..8,
            scores in proptest::collection::vec(score_strategy(), 0..200),
        ) {
            let mut gate = SmileGate::new(GateConfig::new(0.8, required)).unwrap();
            let mut captures = 0;

            for (i, score) in scores.iter().enumerate() {
                let frame = match score {
                    Some(h) => FrameScore::face(*h, i as u64),
                    None => FrameScore::no_face(i as u64),
                };
                if gate.observe(&frame) == GateAction::Capture {
                    captures += 1;
                }
                prop_assert!(gate.credit() <= required);
            }

            prop_assert!(captures <= 1);
            prop_assert_eq!(captures == 1, gate.is_triggered());
        }

        #[test]
        fn prop_unbroken_run_always_fires(
            required in 1u32..8,
            prefix in proptest::collection::vec(score_strategy(), 0..50),
        ) {
            let mut gate = SmileGate::new(GateConfig::new(0.8, required)).unwrap();
            for (i, score) in prefix.iter().enumerate() {
                let frame = match score {
                    Some(h) => FrameScore::face(*h, i as u64),
                    None => FrameScore::no_face(i as u64),
                };
                gate.observe(&frame);
            }

            for i in 0..required {
                gate.observe(&FrameScore::face(0.95, 1000 + i as u64));
            }

            prop_assert!(gate.is_triggered());
        }

        #[test]
        fn prop_too_few_smiles_never_fire(
            required in 2u32..8,
            misses in proptest::collection::vec(0.0f64..=0.8, 0..100),
        ) {
            let mut gate = SmileGate::new(GateConfig::new(0.8, required)).unwrap();

            // required - 1 smiles, scattered among misses
            let mut smiles_left = required - 1;
            for (i, miss) in misses.iter().enumerate() {
                if smiles_left > 0 && i % 3 == 0 {
                    gate.observe(&FrameScore::face(0.9, i as u64));
                    smiles_left -= 1;
                }
                gate.observe(&FrameScore::face(*miss, i as u64));
            }

            prop_assert!(!gate.is_triggered());
        }
    }
}
