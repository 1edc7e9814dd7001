//! Application core — command dispatch and the lamp state model.
//!
//! Hardware and transport I/O flow through the port traits in
//! [`ports`]; the domain logic itself is pure and host-testable.

pub mod channels;
pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod state;

pub use commands::Command;
pub use service::DeviceService;
pub use state::{DeviceState, LampChannel};
