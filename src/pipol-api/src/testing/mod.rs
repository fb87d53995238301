//! Test utilities for PIPOL.
//!
//! This module provides an in-process stub of the PIPOL backend so client
//! code can be exercised against a real HTTP listener without a deployed
//! server.
//!
//! # Feature Flag
//!
//! This module is only available when the `testing` feature is enabled or during tests:
//!
//! ```toml
//! [dev-dependencies]
//! pipol-api = { path = "../pipol-api", features = ["testing"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use pipol_api::testing::StubBackend;
//!
//! let server = StubBackend::new()
//!     .with_user("Ada Lovelace", "ada@pipol.test", "analytical")
//!     .spawn()
//!     .await;
//! let base_url = server.base_url();
//! ```

mod stub_backend;

pub use stub_backend::{StubBackend, StubServer};
