use super::Level;
use super::frame::Frame;
use crate::utils::consts::{HALF_PERIOD_US, START_PULSES, TX_TAIL_HOLD_US};
use tracing::debug;

/// One transmit action: drive the line to `level` and hold for `hold_us`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxStep {
    pub level: Level,
    pub hold_us: u64,
}

/// Serializes frames into pulse-width keyed level steps.
///
/// Bits go out most-significant first. Each bit toggles the line once and
/// holds one half-period; a "1" bit holds a second half-period before the
/// next toggle. The step list is pure data: the caller plays it out
/// against a clock, which keeps the bit timing testable without real time
/// passing.
pub struct OokEncoder {
    half_period_us: u64,
}

impl OokEncoder {
    pub fn new() -> Self {
        Self {
            half_period_us: HALF_PERIOD_US,
        }
    }

    /// Encode a complete frame transmission:
    /// [start pulses] [signature] [length] [payload] [checksum] [low tail]
    ///
    /// The line starts high (calibration reference for the receiver) and
    /// always ends with a low hold long enough to register as
    /// end-of-frame on the peer.
    pub fn encode_frame(&self, frame: &Frame) -> Vec<TxStep> {
        let bytes = frame.to_bytes();
        let mut steps = Vec::with_capacity(START_PULSES + bytes.len() * 8 + 1);

        let mut level = Level::High;
        steps.push(TxStep {
            level,
            hold_us: self.half_period_us * START_PULSES as u64,
        });

        for &byte in &bytes {
            for bit in (0..8).rev() {
                level = level.toggled();
                let is_one = (byte >> bit) & 1 != 0;
                steps.push(TxStep {
                    level,
                    hold_us: if is_one {
                        self.half_period_us * 2
                    } else {
                        self.half_period_us
                    },
                });
            }
        }

        steps.push(TxStep {
            level: Level::Low,
            hold_us: TX_TAIL_HOLD_US,
        });

        debug!(
            "Encoded frame: {} bytes, {} steps, {} us on air",
            bytes.len(),
            steps.len(),
            steps.iter().map(|s| s.hold_us).sum::<u64>()
        );
        steps
    }
}

impl Default for OokEncoder {
    fn default() -> Self {
        Self::new()
    }
}
