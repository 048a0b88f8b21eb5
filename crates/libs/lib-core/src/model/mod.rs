//! # Model Layer
//!
//! Domain records and the stores that own them.

pub mod store;
