//! Client core for the SIGAC complementary-activities console.
//!
//! Everything the console needs between its UI and the SIGAC REST API:
//! a token store with cookie persistence, an HTTP client that transparently
//! refreshes expired access tokens behind a single-flight queue, the session
//! lifecycle with cross-tab sign-out, and the server-side route guards.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod session;
pub mod token;

pub use api::{AccessLevel, ApiClient, RuntimeContext};
pub use config::Config;
pub use error::ApiError;
pub use guard::{with_auth, with_guest, GuardOutcome};
pub use session::{Session, SessionHooks};
pub use token::{TokenPair, TokenStore};
