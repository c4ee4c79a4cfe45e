//! Newtype wrappers for Shopify global IDs.
//!
//! Use the `define_gid!` macro to create type-safe wrappers that prevent
//! passing an operation handle where a product ID is expected.

/// Macro to define a type-safe Shopify global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `numeric_id()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use catalog_sync_core::define_gid;
/// define_gid!(CollectionGid);
///
/// let id = CollectionGid::new("gid://shopify/Collection/42");
/// assert_eq!(id.numeric_id(), Some(42));
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a global ID string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the full `gid://shopify/...` string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Trailing numeric segment of the global ID, if there is one.
            #[must_use]
            pub fn numeric_id(&self) -> Option<u64> {
                self.0.rsplit('/').next().and_then(|s| s.parse().ok())
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

// e.g. gid://shopify/Product/108828309
define_gid!(ProductGid);
// e.g. gid://shopify/ProductSetOperation/1704073
define_gid!(OperationGid);
