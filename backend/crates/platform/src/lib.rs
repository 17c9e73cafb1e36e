//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Key-value store (Redis or in-process) for sessions and cached documents
//! - Password hashing (Argon2id)
//! - Cookie management
//! - Duration strings (`"5m"`, `"3d"`) to seconds
//! - Random activation codes
//! - Outgoing mail queue

pub mod cookie;
pub mod crypto;
pub mod duration;
pub mod kv;
pub mod mail;
pub mod password;
