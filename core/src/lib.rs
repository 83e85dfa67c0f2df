//! Core library for the nosh macro tracker.
//!
//! Everything stateful lives behind [`db::Database`]; the engines
//! (`ledger`, `streak`, `goals`, `quota`) are pure state machines the
//! service layer composes into logging operations.

pub mod catalog;
pub mod db;
pub mod error;
pub mod goals;
pub mod ledger;
pub mod models;
pub mod normalize;
pub mod quota;
pub mod service;
pub mod streak;
