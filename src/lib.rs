//! TestCraft Relay - AI relay for requirements-to-test-case workflows
//!
//! The relay accepts requirement documents and test artifacts over HTTP,
//! turns them into prompts for a hosted model on Amazon Bedrock, and returns
//! structured analyses, scenarios, test cases and reports. A client-side
//! orchestrator drives the relay from a local document store and falls back
//! to simulated results when the relay cannot be reached.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
