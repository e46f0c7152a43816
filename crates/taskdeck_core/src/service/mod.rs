//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate resolve -> authorize -> repository -> aggregate flows into
//!   use-case level APIs.
//! - Keep transport layers decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass the authorization gate or repository validation.
//! - Within one call the order resolve -> authorize -> read/mutate ->
//!   aggregate is strictly sequential.

pub mod list_service;
pub mod task_service;
