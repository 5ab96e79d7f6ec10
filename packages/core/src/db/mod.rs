//! Storage Boundaries
//!
//! The editor core talks to the outside world through three traits:
//!
//! - [`PageRepository`]: page creation, debounced page writes, page lookup,
//!   single node-attribute writes
//! - [`AssetStore`]: image upload and download
//! - [`IdentityProvider`]: who is signed in
//!
//! Reference adapters live next to the traits:
//!
//! - [`InMemoryPageStore`]: process-memory repository (tests, dev tool)
//! - [`LibsqlPageStore`]: local libsql database (`libsql` feature, on by default)
//! - [`LocalAssetStore`]: image files under a directory
//! - [`StaticIdentity`]: fixed user id

mod asset_store;
mod error;
mod identity;
#[cfg(feature = "libsql")]
mod libsql_store;
mod local_assets;
mod memory_store;
mod page_repository;

pub use asset_store::{AssetStore, ImageFile, UploadedImage};
pub use error::StoreError;
pub use identity::{IdentityProvider, StaticIdentity};
#[cfg(feature = "libsql")]
pub use libsql_store::LibsqlPageStore;
pub use local_assets::LocalAssetStore;
pub use memory_store::InMemoryPageStore;
pub use page_repository::PageRepository;
