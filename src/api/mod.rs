//! Typed access to the SIGAC REST API.

mod activities;
mod auth;
mod categories;
mod charts;
pub mod client;
mod courses;
mod institutions;
mod regulations;
pub mod types;
mod users;

pub use client::*;
pub use types::*;

#[cfg(test)]
pub mod test_support;
