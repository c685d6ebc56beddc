pub mod config;
pub mod driver;
pub mod errors;
pub mod gate;
pub mod scenario;
pub mod session;
pub mod ui;

pub use driver::Driver;
pub use gate::{GateClient, HttpGateClient};
pub use session::{Phase, Turn};
