//! # Utilities Library
//!
//! Shared utility functions for environment variables, time, and input validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_bool, get_env_list, get_env_parse, get_env_parse_or};
pub use time::{format_time, format_local, now_utc, parse_utc};
pub use validation::{char_len, is_valid_email, validate_email, validate_min_length};
