use crate::device::{Clock, InputLine, OutputLine, Trigger};
use crate::phy::{EdgeDecoder, Frame, FrameError, OokEncoder, SessionEnd};
use crate::utils::consts::ACK_MESSAGE;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderState {
    /// Waiting for the trigger button.
    Idle,
    /// Emitting one frame, blocking for each level hold.
    Transmitting,
    /// Elapsed-time check against the transmit window.
    Cooldown,
    /// Window elapsed; decoding reverse-leg traffic.
    Listening,
    /// Acknowledgement received.
    Done,
}

/// Transmit-side machine. Parameterised by payload and window so the
/// same machine serves both the credential leg and the reverse
/// acknowledgement leg (which runs a doubled window).
pub struct SenderMachine {
    state: SenderState,
    frame: Frame,
    timeout_ms: u64,
    encoder: OokEncoder,
    decoder: EdgeDecoder,
    started_at_us: Option<u64>,
}

impl SenderMachine {
    pub fn new(payload: &[u8], timeout_ms: u64) -> Result<Self, FrameError> {
        Ok(Self {
            state: SenderState::Idle,
            frame: Frame::build(payload)?,
            timeout_ms,
            encoder: OokEncoder::new(),
            decoder: EdgeDecoder::new(),
            started_at_us: None,
        })
    }

    pub fn state(&self) -> SenderState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == SenderState::Done
    }

    /// Advance at most one transition. Transmitting is the one phase
    /// that blocks: output timing accuracy requires owning the timeline
    /// while the frame goes out.
    pub fn poll(
        &mut self,
        clock: &mut dyn Clock,
        out: &mut dyn OutputLine,
        input: &mut dyn InputLine,
        trigger: &mut dyn Trigger,
    ) {
        match self.state {
            SenderState::Idle => {
                if trigger.pressed() {
                    info!("Trigger pressed, starting transmission");
                    self.started_at_us = Some(clock.now_us());
                    self.state = SenderState::Transmitting;
                }
            }
            SenderState::Transmitting => {
                for step in self.encoder.encode_frame(&self.frame) {
                    out.set(step.level);
                    clock.hold(step.hold_us);
                }
                self.state = SenderState::Cooldown;
            }
            SenderState::Cooldown => {
                let started = self.started_at_us.unwrap_or(0);
                let elapsed_ms = clock.now_us().saturating_sub(started) / 1_000;
                if elapsed_ms >= self.timeout_ms {
                    info!("Transmit window elapsed, listening for acknowledgement");
                    self.state = SenderState::Listening;
                } else {
                    // Best-effort link: repeat the frame for the whole window.
                    self.state = SenderState::Transmitting;
                }
            }
            SenderState::Listening => {
                let now = clock.now_us();
                let level = input.level();
                match self.decoder.poll(now, level) {
                    Some(SessionEnd::Bytes(bytes)) => match Frame::parse(&bytes) {
                        Ok(frame) if frame.payload() == ACK_MESSAGE.as_bytes() => {
                            info!("Acknowledgement received");
                            self.state = SenderState::Done;
                        }
                        Ok(frame) => {
                            debug!("Ignoring frame with unexpected payload ({} bytes)", frame.payload().len());
                        }
                        Err(e) => warn!("Rejected frame: {}", e),
                    },
                    Some(_) | None => {}
                }
            }
            SenderState::Done => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{PressOnce, Waveform};
    use crate::phy::Level;
    use crate::utils::consts::TX_TIMEOUT_MS;

    struct StepClock {
        now: u64,
    }

    impl Clock for StepClock {
        fn now_us(&self) -> u64 {
            self.now
        }
        fn hold(&mut self, us: u64) {
            self.now += us;
        }
    }

    #[derive(Default)]
    struct RecordingLine {
        levels: Vec<Level>,
    }

    impl OutputLine for RecordingLine {
        fn set(&mut self, level: Level) {
            self.levels.push(level);
        }
    }

    struct FixedInput {
        level: Level,
    }

    impl InputLine for FixedInput {
        fn level(&mut self) -> Level {
            self.level
        }
    }

    struct NeverPressed;

    impl Trigger for NeverPressed {
        fn pressed(&mut self) -> bool {
            false
        }
    }

    fn machine() -> SenderMachine {
        SenderMachine::new(b"myssid:mypassword", TX_TIMEOUT_MS).unwrap()
    }

    #[test]
    fn test_idle_until_trigger() {
        let mut sender = machine();
        let mut clock = StepClock { now: 0 };
        let mut out = RecordingLine::default();
        let mut input = FixedInput { level: Level::Low };

        sender.poll(&mut clock, &mut out, &mut input, &mut NeverPressed);
        assert_eq!(sender.state(), SenderState::Idle);

        sender.poll(&mut clock, &mut out, &mut input, &mut PressOnce::new());
        assert_eq!(sender.state(), SenderState::Transmitting);
    }

    #[test]
    fn test_repeats_until_window_elapses() {
        let mut sender = machine();
        let mut clock = StepClock { now: 0 };
        let mut out = RecordingLine::default();
        let mut input = FixedInput { level: Level::Low };
        let mut trigger = PressOnce::new();

        sender.poll(&mut clock, &mut out, &mut input, &mut trigger);
        sender.poll(&mut clock, &mut out, &mut input, &mut trigger);
        assert_eq!(sender.state(), SenderState::Cooldown);
        assert!(!out.levels.is_empty());

        // still inside the window: cooldown re-enters transmit
        sender.poll(&mut clock, &mut out, &mut input, &mut trigger);
        assert_eq!(sender.state(), SenderState::Transmitting);

        clock.now += TX_TIMEOUT_MS * 1_000;
        sender.poll(&mut clock, &mut out, &mut input, &mut trigger);
        sender.poll(&mut clock, &mut out, &mut input, &mut trigger);
        assert_eq!(sender.state(), SenderState::Listening);
    }

    #[test]
    fn test_acknowledgement_completes() {
        let mut sender = machine();
        let mut clock = StepClock { now: 0 };
        let mut out = RecordingLine::default();
        let mut trigger = PressOnce::new();

        // reach Listening
        let mut input = FixedInput { level: Level::Low };
        sender.poll(&mut clock, &mut out, &mut input, &mut trigger);
        sender.poll(&mut clock, &mut out, &mut input, &mut trigger);
        clock.now += TX_TIMEOUT_MS * 1_000;
        sender.poll(&mut clock, &mut out, &mut input, &mut trigger);

        // replay an encoded acknowledgement at the line
        let ack = Frame::build(ACK_MESSAGE.as_bytes()).unwrap();
        let steps = OokEncoder::new().encode_frame(&ack);
        let wave = Waveform::from_steps(&steps, clock.now + 10_000);
        for (t, level) in wave.sample_every(100, 50_000) {
            clock.now = t.max(clock.now);
            let mut input = FixedInput { level };
            sender.poll(&mut clock, &mut out, &mut input, &mut trigger);
            if sender.is_done() {
                break;
            }
        }
        assert_eq!(sender.state(), SenderState::Done);
    }

    #[test]
    fn test_non_ack_payload_is_ignored() {
        let mut sender = machine();
        let mut clock = StepClock { now: 0 };
        let mut out = RecordingLine::default();
        let mut trigger = PressOnce::new();

        let mut input = FixedInput { level: Level::Low };
        sender.poll(&mut clock, &mut out, &mut input, &mut trigger);
        sender.poll(&mut clock, &mut out, &mut input, &mut trigger);
        clock.now += TX_TIMEOUT_MS * 1_000;
        sender.poll(&mut clock, &mut out, &mut input, &mut trigger);

        let other = Frame::build(b"Goodbye").unwrap();
        let steps = OokEncoder::new().encode_frame(&other);
        let wave = Waveform::from_steps(&steps, clock.now + 10_000);
        for (t, level) in wave.sample_every(100, 50_000) {
            clock.now = t.max(clock.now);
            let mut input = FixedInput { level };
            sender.poll(&mut clock, &mut out, &mut input, &mut trigger);
        }
        assert_eq!(sender.state(), SenderState::Listening);
    }

    #[test]
    fn test_oversize_payload_rejected_at_construction() {
        let payload = vec![b'a'; 300];
        assert!(matches!(
            SenderMachine::new(&payload, TX_TIMEOUT_MS),
            Err(FrameError::PayloadTooLong(300))
        ));
    }
}
