use super::{InputLine, OutputLine, Trigger};
use crate::phy::{Level, TxStep};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory radio line shared between an in-process sender and
/// receiver. Clone it to hand one end to each role.
#[derive(Clone, Default)]
pub struct SimLine {
    level: Arc<AtomicBool>,
}

impl SimLine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputLine for SimLine {
    fn set(&mut self, level: Level) {
        self.level.store(level == Level::High, Ordering::SeqCst);
    }
}

impl InputLine for SimLine {
    fn level(&mut self) -> Level {
        if self.level.load(Ordering::SeqCst) {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Scripted line recording: the level transitions a transmission would
/// produce, addressable by timestamp. Lets tests and offline tools walk
/// a receive session without real time passing.
pub struct Waveform {
    transitions: Vec<(u64, Level)>,
}

impl Waveform {
    /// Record the transitions of an encoded step sequence, with the
    /// first level change landing at `start_us`.
    pub fn from_steps(steps: &[TxStep], start_us: u64) -> Self {
        let mut transitions = Vec::with_capacity(steps.len());
        let mut t = start_us;
        for step in steps {
            transitions.push((t, step.level));
            t += step.hold_us;
        }
        Self { transitions }
    }

    pub fn from_transitions(transitions: Vec<(u64, Level)>) -> Self {
        Self { transitions }
    }

    pub fn transitions(&self) -> &[(u64, Level)] {
        &self.transitions
    }

    /// Line level at `t_us`. The line idles low before the recording.
    pub fn level_at(&self, t_us: u64) -> Level {
        self.transitions
            .iter()
            .take_while(|&&(at, _)| at <= t_us)
            .last()
            .map_or(Level::Low, |&(_, level)| level)
    }

    /// Timestamp of the final transition. The line stays at that level
    /// afterwards; the final hold is not included.
    pub fn end_us(&self) -> u64 {
        self.transitions.last().map_or(0, |&(at, _)| at)
    }

    /// Sample the waveform every `interval_us` from t=0 through
    /// `trailing_us` past the last transition.
    pub fn sample_every(&self, interval_us: u64, trailing_us: u64) -> Vec<(u64, Level)> {
        let end = self.end_us() + trailing_us;
        (0..=end / interval_us)
            .map(|i| {
                let t = i * interval_us;
                (t, self.level_at(t))
            })
            .collect()
    }
}

/// Trigger that reports a single press on first poll. Stands in for the
/// debounced hardware button in demos and tests.
#[derive(Default)]
pub struct PressOnce {
    fired: bool,
}

impl PressOnce {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Trigger for PressOnce {
    fn pressed(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }
}
