// Browser session state
pub mod session;

pub use session::*;
