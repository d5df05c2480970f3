//! Call intelligence server library.
//!
//! This library provides the backend for the call dashboard: recording
//! ingestion, analysis status tracking, leads, and the company knowledge base.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
