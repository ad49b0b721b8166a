//! json-fixtures - load and guard large static test fixtures
//!
//! Functional tests that push bulk JSON through a codec or an HTTP stack need input that never
//! changes under them. This crate bundles such a fixture (720 synthetic user records, roughly
//! 515kb of compact JSON), exposes it as an immutable process-wide store and checks the
//! invariants that keep it useful: contiguous indexes, unique ids, a homogeneous field set,
//! lossless round trips and a stable encoded size.
pub mod baseline;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod contract;
pub mod payload;
pub mod store;
pub mod types;
