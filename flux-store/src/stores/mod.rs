//! Generic store kinds
//!
//! - `KeyedStore`: one item per case-insensitive key, per-key load state
//! - `CollectionStore`: a list loaded in one request, looked up by id
//! - `ValueStore`: a single value

mod collection;
mod keyed;
mod value;

pub use collection::{CollectionActions, CollectionItem, CollectionStore, CollectionUpdate};
pub use keyed::{KeyedActions, KeyedStore, KeyedUpdate};
pub use value::{ValueActions, ValueStore, ValueUpdate};
