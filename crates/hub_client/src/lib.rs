//! CorpusHub API client — shared between desktop and CLI.
//!
//! This crate is the single source of truth for the annotation server
//! wire contract: auth, save, history list, selective revert, canonical
//! transcript fetch.
//!
//! No GUI concepts. No retries. No progress bars.

mod auth;
mod client;

pub use auth::{auth_file_path, delete_auth, load_auth, save_auth, AuthCredentials};
pub use client::{HubClient, HubError, UserInfo};
