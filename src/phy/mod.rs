// Physical layer: pulse-width OOK framing over a single digital line

pub mod decoder;
pub mod encoder;
pub mod frame;

pub use decoder::{EdgeDecoder, SessionEnd};
pub use encoder::{OokEncoder, TxStep};
pub use frame::{Frame, FrameError};

/// Digital level on the radio line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn toggled(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}
