/// Log level (overridable via RUST_LOG)
pub const LOG_LEVEL: &str = "info";

// ============================================================================
// Wire timing (fixed by the peer devices, do not tune)
// ============================================================================

/// Duration of one half-period level hold during transmit (microseconds).
/// A "0" bit is one half-period pulse, a "1" bit is two.
pub const HALF_PERIOD_US: u64 = 2_000;

/// Silence on the line for longer than this ends the receive session
/// (microseconds). Two orders of magnitude above one bit period.
pub const IDLE_TIMEOUT_US: u64 = 40_000;

/// Low hold appended after the last byte of a transmission so the peer
/// sees a clean end-of-frame gap (microseconds).
pub const TX_TAIL_HOLD_US: u64 = 40_000;

/// Level changes closer together than this are electrical glitches and
/// are ignored by the decoder (microseconds).
pub const NOISE_REJECT_US: u64 = 1_500;

/// The calibration delta is scaled by this margin so that genuine "1"
/// pulses always classify as longer than one unit.
pub const CALIBRATION_MARGIN: f64 = 0.90;

/// Number of high half-period calibration pulses before the first byte.
pub const START_PULSES: usize = 1;

// ============================================================================
// Framing
// ============================================================================

/// Fixed signature identifying valid frames.
pub const SIGNATURE: [u8; 4] = [0x63, 0xF9, 0x5C, 0x1B];

/// Sessions that decoded fewer bytes than this never reach the framer.
pub const MIN_FRAME_BYTES: usize = 4;

/// Payload length travels as a single byte.
pub const MAX_PAYLOAD_BYTES: usize = 255;

// ============================================================================
// Role timing
// ============================================================================

/// The sender repeats the frame for this long after the trigger, then
/// flips to listening (milliseconds).
pub const TX_TIMEOUT_MS: u64 = 5_000;

/// Transmit window for the acknowledging peer. Deliberately double the
/// sender's window so the two devices never race each other
/// (milliseconds).
pub const PEER_TX_TIMEOUT_MS: u64 = 10_000;

/// Fixed literal transmitted on the reverse acknowledgement leg.
pub const ACK_MESSAGE: &str = "Hello";
