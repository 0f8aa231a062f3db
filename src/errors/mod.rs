// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod executor;
mod resolver;

pub use executor::ExecutorError;
pub use resolver::{DependencyError, DependencyErrorKind};
