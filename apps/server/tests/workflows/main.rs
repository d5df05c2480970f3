//! Workflow test suite.
//!
//! Drives recording ingestion, retry and brain documents against in-memory
//! stores, and the webhook transports against a local mock HTTP server. No
//! database or object storage is needed.
//!
//! Run with: cargo test --test workflows

mod test_helpers;

mod test_documents;
mod test_ingestion;
mod test_notifier;
mod test_reconciliation;
