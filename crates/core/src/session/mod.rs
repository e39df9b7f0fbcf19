//! Session ports and rules

pub mod ports;
pub mod route_guard;
