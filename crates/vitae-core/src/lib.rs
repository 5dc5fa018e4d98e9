//! Core types, validation rules and use cases for the Vitae resume service.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement the traits in [`store`]; the HTTP layer drives
//! the use cases in [`accounts`], [`scoped`] and [`aggregate`].

pub mod accounts;
pub mod aggregate;
pub mod credential;
pub mod error;
pub mod identity;
pub mod item;
pub mod profile;
pub mod scoped;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
