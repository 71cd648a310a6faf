//! Core types shared by the hn-clone API crates.
//!
//! Errors raised anywhere in the documentation pipeline are classified by an
//! [`ErrorCode`], which the HTTP layer turns into a status and the CLI turns
//! into a process exit code.

pub mod error;

pub use error::{ErrorCode, ErrorResponse, IntoErrorCode};
