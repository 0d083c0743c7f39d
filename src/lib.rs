//! Clinix Triage - Deterministic symptom triage
//!
//! Turns a structured symptom record into a triage decision: feature
//! engineering against a versioned schema, risk scoring with a loaded model
//! artifact, threshold banding with a red-flag safety override, and an
//! explanation whose factor selection never depends on a language model.
//! Parsing free text and wording explanations sit behind ports so the core
//! runs without any network access.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
