//! Canonical transform engine
//!
//! Converts positional records from both statistics families into the
//! canonical record model: the full 24-field typed header with its derived
//! fields, and the fixed 96-slot data payload. Current-format records need
//! only value fixes; legacy records are bridged wholesale, including the
//! per-line-type numeric derivations and slot relayouts.
//!
//! ## Architecture
//!
//! - [`dates`] - Cached timestamp parsing for both family formats
//! - [`current`] - Current-format value fixes and header typing
//! - [`legacy`] - Legacy bridging, derivations, and slot layouts
//! - [`object`] - Derived columns for object-based verification files
//!
//! A row that fails a numeric derivation is returned as an error; the caller
//! logs it and continues with the batch.

pub mod current;
pub mod dates;
pub mod legacy;
pub mod object;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use current::CurrentTransformer;
pub use dates::DateParser;
pub use legacy::{LegacyTransformer, ensemble_suffix};
pub use object::derive_object_init;
