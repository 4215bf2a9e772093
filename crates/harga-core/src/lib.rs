//! Core types and trait definitions for the harga price service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::PriceStore`]; transports drive
//! [`service::PriceService`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod error;
pub mod observation;
pub mod service;
pub mod store;

pub use error::{Error, ErrorKind, Result};
