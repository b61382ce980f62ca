//! Media storage adapters.

mod client;
mod mock;

pub use client::CloudinaryStorage;
pub use mock::MockMediaStorage;
