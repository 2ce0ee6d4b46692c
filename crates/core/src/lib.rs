//! Core business logic for the job board.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through repository traits implemented by the db crate.
//!
//! # Modules
//!
//! - `auth` - Roles and password hashing
//! - `policy` - Access policy evaluator (ownership and role rules)
//! - `storage` - Document byte storage backends
//! - `offer` - Job offer management
//! - `application` - Applications to offers
//! - `document` - CV and cover letter uploads attached to applications

pub mod application;
pub mod auth;
pub mod document;
pub mod offer;
pub mod policy;
pub mod storage;
