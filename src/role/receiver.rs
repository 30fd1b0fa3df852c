use crate::credentials::Credentials;
use crate::device::{Clock, InputLine, NetworkJoin};
use crate::phy::{EdgeDecoder, Frame, SessionEnd};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    /// Timing decoder active on the input line.
    Listening,
    /// A validated frame is pending the credential split.
    ApplyCredentials,
    /// Credentials handed to the network-join collaborator.
    Done,
}

/// Receive-side machine. Every validation failure is recovered locally:
/// the session resets and the machine returns to listening. Nothing but
/// a fully validated frame ever reaches the credential consumer.
pub struct ReceiverMachine {
    state: ReceiverState,
    decoder: EdgeDecoder,
    pending: Option<Vec<u8>>,
    credentials: Option<Credentials>,
}

impl ReceiverMachine {
    pub fn new() -> Self {
        Self {
            state: ReceiverState::Listening,
            decoder: EdgeDecoder::new(),
            pending: None,
            credentials: None,
        }
    }

    pub fn state(&self) -> ReceiverState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ReceiverState::Done
    }

    /// Credentials applied so far, if any.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Advance at most one transition.
    pub fn poll(
        &mut self,
        clock: &mut dyn Clock,
        input: &mut dyn InputLine,
        joiner: &mut dyn NetworkJoin,
    ) {
        match self.state {
            ReceiverState::Listening => {
                let now = clock.now_us();
                let level = input.level();
                match self.decoder.poll(now, level) {
                    Some(SessionEnd::Bytes(bytes)) => match Frame::parse(&bytes) {
                        Ok(frame) => {
                            info!("Frame accepted: {} payload bytes", frame.payload().len());
                            self.pending = Some(frame.payload().to_vec());
                            self.state = ReceiverState::ApplyCredentials;
                        }
                        Err(e) => warn!("Rejected frame: {}", e),
                    },
                    // short and noise-only sessions are logged by the decoder
                    Some(_) | None => {}
                }
            }
            ReceiverState::ApplyCredentials => {
                let payload = self.pending.take().unwrap_or_default();
                match Credentials::parse(&payload) {
                    Ok(creds) => {
                        joiner.join(&creds.ssid, &creds.password);
                        self.credentials = Some(creds);
                        self.state = ReceiverState::Done;
                    }
                    Err(e) => {
                        warn!("Dropping frame: {}", e);
                        self.state = ReceiverState::Listening;
                    }
                }
            }
            ReceiverState::Done => {}
        }
    }
}

impl Default for ReceiverMachine {
    fn default() -> Self {
        Self::new()
    }
}
