//! Question server module.
//!
//! Serves a question bank over WebSocket so takers on other machines can
//! load tests with a `RemoteRepository`.

mod server;

pub use server::{run, serve};
