//! sysdash: host metrics sampling, streaming, and playback.
//!
//! The server side samples host resource utilization at a fixed cadence,
//! pushes each sample to connected WebSocket viewers, and appends it to a
//! durable SQLite log. The client side keeps an ordered history of received
//! samples and supports scrubbing backward/forward through them.

pub mod client;
pub mod config;
pub mod database;
pub mod errors;
pub mod history;
pub mod models;
pub mod repositories;
pub mod sampler;
pub mod session;
pub mod web;
