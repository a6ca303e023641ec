//! Asset model, classification and content addressing.

pub mod classify;
pub mod key;
mod kind;
pub mod manifest;
pub mod minify;
mod store;

pub use classify::{Classified, Groups, classify};
pub use kind::AssetKind;
pub use store::{Asset, AssetMap};

#[cfg(test)]
pub(crate) use store::fixture;
