// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reference [`TaskExecutor`] implementations for tests and the demo binary.
//! Concrete task executors (shell, HTTP, file I/O) are an external
//! collaborator in the engine proper; these exist only so the executor's own
//! logic can be exercised end to end.

mod echo;
mod fail;
mod shell;
mod sleep;

pub use echo::EchoTask;
pub use fail::FailTask;
pub use shell::ShellTask;
pub use sleep::SleepTask;
