//! Testing infrastructure for logsleuth tests.
//!
//! This crate provides in-memory stand-ins for the three external services
//! the tool talks to, plus builders for realistic segment documents:
//! - `fakes`: `MemoryTraceStore`, `StaticDeliveryProbe`, `ScriptedQueryService`
//! - `fixtures`: segment-document and trace builders

pub mod fakes;
pub mod fixtures;
