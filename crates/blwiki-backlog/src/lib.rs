//! Backlog wiki integration for blwiki.
//!
//! [`BacklogClient`] talks to the Backlog REST API v2 and implements the
//! [`blwiki_sync::PageRepository`] and [`blwiki_sync::AttachmentProvider`]
//! collaborator traits, so it can be handed straight to a
//! [`blwiki_sync::Reconciler`].
//!
//! # Example
//!
//! ```no_run
//! use blwiki_backlog::BacklogClient;
//! use blwiki_sync::PageRepository;
//!
//! let client = BacklogClient::new("https://acme.backlog.jp/api/v2", "DOCS", "api-key");
//! let pages = client.list_pages()?;
//! # Ok::<(), blwiki_sync::RemoteError>(())
//! ```

mod client;
mod error;
mod remote;
pub mod types;

pub use client::BacklogClient;
pub use error::{BacklogError, mask_api_key};
