//! String identifiers for cities and building types.
use anyhow::{Context, Result};
use indexmap::IndexSet;
use std::borrow::Borrow;
use std::hash::Hash;

/// Declare a cheaply clonable string identifier type called `$name`
macro_rules! define_id_type {
    ($name:ident) => {
        /// A string identifier, shared between clones
        #[derive(
            Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub std::rc::Rc<str>);

        impl $name {
            /// Make an identifier from `id`
            pub fn new(id: &str) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier text
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id.into())
            }
        }
    };
}
pub(crate) use define_id_type;

#[cfg(test)]
define_id_type!(GenericID);

/// Lookup of known IDs by their text
pub trait IDCollection<ID> {
    /// Find the stored copy of the ID spelled `id`.
    ///
    /// Returning the stored copy means the result shares its allocation with the collection.
    fn get_id_by_str(&self, id: &str) -> Result<ID>;
}

impl<ID> IDCollection<ID> for IndexSet<ID>
where
    ID: Borrow<str> + Hash + Eq + Clone,
{
    fn get_id_by_str(&self, id: &str) -> Result<ID> {
        self.get(id)
            .cloned()
            .with_context(|| format!("Unknown ID {id} found"))
    }
}
