pub mod client;
pub mod error;
pub mod notifier;
pub mod result;
pub mod target;

pub use client::{HttpPinger, PingClient, PingFuture};
pub use error::PingError;
pub use notifier::{FanOut, Notifier};
pub use result::{PingOutcome, PingResult};
pub use target::PingTarget;
