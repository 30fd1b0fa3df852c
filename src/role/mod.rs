// Per-role cooperative state machines over the shared codec. Each poll
// samples the inputs once and advances at most one transition.

pub mod receiver;
pub mod sender;

pub use receiver::{ReceiverMachine, ReceiverState};
pub use sender::{SenderMachine, SenderState};
