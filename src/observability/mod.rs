// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for the resolver and executor.
//!
//! Every operational log line the executor emits is reproduced here as a
//! small struct implementing `Display` (the exact human-readable line) and
//! [`StructuredLog`] (a `tracing` event with the same fields as named
//! attributes). Callers never parse these strings; they exist for operators
//! reading logs, not for downstream control flow.

pub mod messages;

use tracing::Span;

/// A message that can emit both a human-readable log line and a structured
/// `tracing` event carrying the same data as named fields.
pub trait StructuredLog {
    fn log(&self);

    #[allow(dead_code)]
    fn span(&self, name: &str) -> Span;
}
