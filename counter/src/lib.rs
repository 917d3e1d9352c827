#![warn(
    unused_extern_crates,
    missing_debug_implementations,
    rust_2018_idioms,
    clippy::dbg_macro
)]
#![cfg_attr(not(test), warn(clippy::unwrap_used))]
#![forbid(unsafe_code)]

pub mod client;
pub mod openapi;
pub mod schema;

pub use self::{
    client::{fetch_counter, update_counter, Client, Error},
    schema::{CounterValue, ErrorPayload},
};
