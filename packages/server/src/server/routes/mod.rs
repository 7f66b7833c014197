// HTTP routes
pub mod echo;
pub mod home;

pub use echo::*;
pub use home::*;
