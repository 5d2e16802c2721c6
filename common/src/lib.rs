//! # Sweepr Common
//!
//! Models, configuration and error types shared between the scanning engine
//! and the command line front-end.

pub mod config;
pub mod error;
pub mod finding;
pub mod network;
