//! Sessiongate - Cookie-based session authentication
//!
//! This library provides login, session checks and logout backed by a SQL
//! session store.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
