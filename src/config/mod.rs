// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Command-line and environment configuration

pub mod engine;
pub mod server;

pub use engine::EngineArgs;
pub use server::ServerConfig;
