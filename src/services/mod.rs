//! Storage and upstream calls behind the HTTP routes.
//!
//! Each module maps to one table or one external API. Routes only translate
//! requests and map service errors onto status codes.

pub mod auth;
pub mod questions;
pub mod session;
pub mod settings;
pub mod todo;
