//! Stockroom API library.
//!
//! This crate provides the inventory API as a library, allowing it to be
//! tested and reused. The `stockroom-api` binary wires it to a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
