pub mod ports;
pub mod range;
pub mod services;
pub mod target;
