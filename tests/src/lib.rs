//! Cross-crate scenarios for the scan engine.

#[cfg(test)]
mod scan;
#[cfg(test)]
mod utils;
