//! # Sweepr Core
//!
//! The scanning engine: a [`probe::Prober`] checks one (host, port) pair, a
//! host scanner walks the port set of one host, and the
//! [`scanner::ScanCoordinator`] fans hosts out concurrently while every
//! positive result is serialized through the [`sink::ResultSink`].

pub mod probe;
pub mod scanner;
pub mod session;
pub mod signal;
pub mod sink;
