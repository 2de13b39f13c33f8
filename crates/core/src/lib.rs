//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types shared by the RocketShoes cart components:
//! - `cart` - Cart store, catalog client and local persistence
//! - `cli` - Command-line host that drives the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, catalog records and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
