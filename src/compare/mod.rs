//! Drift detection between source and target deployments.
//!
//! - [`xml`] - Structural, whitespace-tolerant XML tree equality
//! - [`bundle`] - Archive-level comparison restricted to proxy definitions
//!
//! Comparison is structural, never byte-level: reformatting a definition or
//! reordering its attributes is not drift, while changing a tag, attribute,
//! text value or the number or order of child elements is.

pub mod bundle;
pub mod xml;

pub use bundle::{compare_bundles, is_compared_entry};
pub use xml::elements_equal;
