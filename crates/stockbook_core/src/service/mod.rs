//! Use-case facade over the store components.
//!
//! # Responsibility
//! - Own the local and session storage backends.
//! - Run the draft-to-saved transition in one place.
//!
//! # Invariants
//! - UI callers reach storage only through the components handed out here.

pub mod inventory_service;
