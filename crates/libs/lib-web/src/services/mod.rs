//! # Services Layer
//!
//! Side effects that handlers trigger but do not own.
//!
//! - [`contact_mail`]: the notification email for a new contact submission

pub mod contact_mail;

pub use contact_mail::{notify_new_contact, render_notification};
