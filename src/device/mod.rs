// Collaborator seams for everything outside the codec: pin I/O, time,
// the trigger button, and the network join step. Production GPIO lives
// behind these traits; the crate ships in-memory implementations so the
// whole link runs headless.

pub mod clock;
pub mod sim;

pub use clock::SystemClock;
pub use sim::{PressOnce, SimLine, Waveform};

use crate::phy::Level;
use tracing::info;

/// Drives the transmit line.
pub trait OutputLine {
    fn set(&mut self, level: Level);
}

/// Samples the receive line.
pub trait InputLine {
    fn level(&mut self) -> Level;
}

/// Monotonic microsecond time plus a blocking hold. Transmission owns
/// the timeline while it runs; receive paths only ever call `now_us`.
pub trait Clock {
    fn now_us(&self) -> u64;
    fn hold(&mut self, us: u64);
}

/// Debounced button press detection.
pub trait Trigger {
    fn pressed(&mut self) -> bool;
}

/// Consumes validated credentials and performs the network association.
pub trait NetworkJoin {
    fn join(&mut self, ssid: &str, password: &str);
}

/// Stand-in joiner that only logs; the real association step is outside
/// this crate.
pub struct LogJoiner;

impl NetworkJoin for LogJoiner {
    fn join(&mut self, ssid: &str, password: &str) {
        info!(
            "Joining network \"{}\" ({} character password)",
            ssid,
            password.len()
        );
    }
}
