// Verified ID Verifier - API Core
//
// Sample server for the Microsoft Entra Verified ID Request Service. Loads
// configuration, checks that a client-credential token with the right app
// role can be acquired, and serves the sample pages.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
