//! Helpers registering file, directory and environment sources on a store.
//!
//! Each helper reads its source once and registers an in-memory provider
//! holding the result. Sources that cannot be read are registered as error
//! providers instead, so their failure stays visible on every resolve.

mod env;
mod file;
mod file_list;
mod refresh;

pub use env::{KeyTransform, env_items, identity_key, transform_key};
pub(crate) use refresh::RefreshHandle;
