//! Authenticated-session state machine, its view projection, and the async driver.

pub mod controller;
pub mod model;
pub mod notify;
pub mod state;
pub mod view;

pub use controller::*;
pub use model::*;
pub use notify::*;
pub use state::*;
pub use view::*;
