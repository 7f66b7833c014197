//! Kernel module - startup checks against the identity platform.

pub mod token_check;

pub use token_check::*;
