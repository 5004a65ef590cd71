//! Request handlers.

pub mod health;
pub mod labels;
pub mod navigation;
pub mod session;

pub use health::*;
pub use labels::*;
pub use navigation::*;
pub use session::*;
