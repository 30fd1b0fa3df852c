// OOK credential-provisioning link: pulse-width timing codec, packet
// framer, and the per-role state machines that drive them.

pub mod credentials;
pub mod device;
pub mod phy;
pub mod role;
pub mod utils;
