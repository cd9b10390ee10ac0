//! Dripwatch - infusion drip line monitoring.
//!
//! Watches a reflective IR sensor on a drip chamber, counts drop events,
//! derives a drops-per-minute rate, classifies line health and pushes
//! status to connected observers in near-real time.
//!
//! # Architecture
//!
//! Three execution contexts share one [`monitor::MonitorState`]:
//!
//! - the hardware interrupt thread delivers falling edges into the drip
//!   statistics register ([`monitor::stats`]),
//! - a watcher task polls the raw level and latches a blockage flag
//!   ([`monitor::blockage`]),
//! - a 1-second evaluator loop classifies line health and broadcasts the
//!   formatted status through the [`hub`] ([`monitor::evaluator`]).
//!
//! The [`server`] exposes `GET /drip-rate` for one-shot queries and
//! `GET /ws` for push subscriptions.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`error`] - Error types for the crate
//! - [`hardware`] - Sensor traits and the Raspberry Pi GPIO backend
//! - [`monitor`] - Statistics register, blockage watcher, alert evaluator
//! - [`status`] - Status line formatting
//! - [`hub`] - Observer set and broadcast fan-out
//! - [`server`] - HTTP query endpoint and WebSocket push channel
//! - [`app`] - Application orchestration
//!
//! # Features
//!
//! - `gpio` (default) - Raspberry Pi sensor backend via `rppal`
//! - `testkit` - Mock sensors for integration tests

pub mod app;
pub mod config;
pub mod error;
pub mod hardware;
pub mod hub;
pub mod monitor;
pub mod server;
pub mod status;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
