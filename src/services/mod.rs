//! Domain services used by HTTP routes and the background watcher.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on protocol translation and auth plumbing.

pub mod auth;
pub mod collection;
pub mod notification;
pub mod ranking;
pub mod release_watch;
pub mod session;
pub mod share;
