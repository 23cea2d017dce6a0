//! Game Collection API - REST backend for a personal video game collection
//!
//! This crate provides:
//! - CRUD endpoints for games under `/api/games`
//! - Field validation that reports every violation at once
//! - Interchangeable persistence: an in-memory map or a relational database via `SeaORM`
//! - Health and API-info endpoints

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;
