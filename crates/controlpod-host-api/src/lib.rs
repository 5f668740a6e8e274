//! Service-manager interface for the ControlPod watchdog
//!
//! This crate defines the boundary between the watchdog core and whatever
//! actually restarts the controlled service. It contains no platform code.

mod mock;
mod traits;

pub use mock::*;
pub use traits::*;
