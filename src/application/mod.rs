//! Application layer - the reconciliation use case.
//!
//! This layer sits between the command layer, which speaks the host's
//! parameter and result formats, and the package domain and runtime.

mod reconcile;

pub use reconcile::{Outcome, ReconcileResult, Reconciler, ReconcilerOptions};
