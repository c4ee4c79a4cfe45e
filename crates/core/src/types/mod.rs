//! Core types for the catalog sync.
//!
//! This module provides the wire shapes on both sides of the sync plus the
//! small amount of state that travels between invocations.

pub mod cursor;
pub mod id;
pub mod operation;
pub mod source;
pub mod target;

pub use cursor::{Cursor, CursorError, OffsetMessage};
pub use id::*;
pub use operation::{OperationStatus, OperationUserError, PolledOperation};
pub use source::{SourceAttribute, SourceImage, SourceProduct, SourceVariant, SourceVariantAttribute};
pub use target::{
    METAFIELD_TYPE, MetafieldInput, OptionValueInput, ProductOptionInput, ProductSetInput,
    VariantInput, VariantOptionValueInput,
};
