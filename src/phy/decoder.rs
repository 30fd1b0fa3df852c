use super::Level;
use crate::utils::consts::{CALIBRATION_MARGIN, IDLE_TIMEOUT_US, MIN_FRAME_BYTES, NOISE_REJECT_US};
use tracing::{debug, trace, warn};

/// Terminal outcome of one decoding session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Idle gap reached with a plausible byte sequence accumulated.
    Bytes(Vec<u8>),
    /// The learned bit period never escaped the noise-reject threshold.
    NoiseOnly,
    /// Fewer bytes than a minimal frame; never handed to the framer.
    TooShort { bytes: usize },
}

/// Pulse-width timing decoder.
///
/// Consumes one `(timestamp, level)` sample per poll and turns level
/// changes into bits. There is no shared clock with the transmitter: the
/// first two accepted edges calibrate the nominal bit period (scaled by a
/// 0.90 margin so genuine double-width pulses always classify long), and
/// every later edge is classified by rounding its delta against that
/// period. A delta rounding to 1 unit is a 0 bit, anything longer is a
/// 1 bit. An unchanged level for longer than the idle threshold closes
/// the session; the session state never survives that boundary.
pub struct EdgeDecoder {
    calibrating: bool,
    calibration_start: Option<u64>,
    /// Learned half-period in microseconds. Only ever shrinks after
    /// calibration: noise lengthens apparent gaps, never shortens the
    /// true unit pulse.
    nominal_period: f64,
    last_edge_us: u64,
    last_level: Level,
    bit_count: u32,
    raw: Vec<u8>,
}

impl EdgeDecoder {
    pub fn new() -> Self {
        Self {
            calibrating: true,
            calibration_start: None,
            nominal_period: f64::INFINITY,
            last_edge_us: 0,
            last_level: Level::Low,
            bit_count: 0,
            raw: Vec::new(),
        }
    }

    /// Feed one sampled line state. Returns `Some` exactly once per
    /// session, when the idle threshold expires.
    pub fn poll(&mut self, now_us: u64, level: Level) -> Option<SessionEnd> {
        let diff = now_us.saturating_sub(self.last_edge_us);

        if level != self.last_level {
            // Sub-threshold gaps are electrical glitches: ignored
            // entirely, leaving last_edge_us and last_level untouched.
            if diff <= NOISE_REJECT_US {
                trace!("Rejected noise edge: {} us since last edge", diff);
                return None;
            }

            if self.calibrating {
                match self.calibration_start {
                    None => self.calibration_start = Some(now_us),
                    Some(first) => {
                        self.nominal_period =
                            (now_us - first) as f64 * CALIBRATION_MARGIN;
                        self.calibrating = false;
                        debug!("Calibrated nominal period: {:.0} us", self.nominal_period);
                    }
                }
            } else {
                if (diff as f64) < self.nominal_period {
                    self.nominal_period = diff as f64;
                }
                // round(ratio) == 1 decodes 0, anything longer decodes 1.
                // Deliberately no upper bound: an overlong accepted gap
                // is still one bit, which keeps wire compatibility.
                let units = (diff as f64 / self.nominal_period).round() as u64;
                if self.bit_count % 8 == 0 {
                    self.raw.push(0);
                }
                self.bit_count += 1;
                if let Some(byte) = self.raw.last_mut() {
                    *byte = (*byte << 1) | u8::from(units > 1);
                }
            }
            self.last_edge_us = now_us;
            self.last_level = level;
            return None;
        }

        if diff > IDLE_TIMEOUT_US {
            return self.end_session(now_us, level);
        }

        None
    }

    /// Close the session at an idle boundary and fully reset. Quiet
    /// periods with no accumulated state produce no outcome.
    fn end_session(&mut self, now_us: u64, level: Level) -> Option<SessionEnd> {
        let saw_activity = self.calibration_start.is_some();
        let bytes = self.raw.len();
        let period_ok = self.nominal_period > NOISE_REJECT_US as f64
            && self.nominal_period.is_finite();

        let outcome = if !saw_activity {
            None
        } else if bytes >= MIN_FRAME_BYTES && period_ok {
            debug!("Session ended with {} bytes", bytes);
            Some(SessionEnd::Bytes(std::mem::take(&mut self.raw)))
        } else if !period_ok {
            warn!("Discarding noise-only session ({} bytes)", bytes);
            Some(SessionEnd::NoiseOnly)
        } else {
            warn!("Discarding short session ({} bytes)", bytes);
            Some(SessionEnd::TooShort { bytes })
        };

        self.calibrating = true;
        self.calibration_start = None;
        self.nominal_period = f64::INFINITY;
        self.bit_count = 0;
        self.raw.clear();
        // Re-arm the idle timer so one silent period terminates exactly once,
        // and carry the live line level into the next session.
        self.last_edge_us = now_us;
        self.last_level = level;

        outcome
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibrating
    }

    /// Learned half-period, once calibration has completed.
    pub fn nominal_period_us(&self) -> Option<f64> {
        (!self.calibrating).then_some(self.nominal_period)
    }

    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    pub fn last_edge_us(&self) -> u64 {
        self.last_edge_us
    }
}

impl Default for EdgeDecoder {
    fn default() -> Self {
        Self::new()
    }
}
