// ecom_server/src/lib.rs

//! HTTP surface of the ecom backend: configuration, error mapping, shared
//! state and actix-web routes. `main.rs` wires these to a real store.

pub mod config;
pub mod errors;
pub mod seed;
pub mod state;
pub mod web;
