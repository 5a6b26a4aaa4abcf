//! bucketsweep Policy
//!
//! Declarative deletion policies for object-storage buckets.
//!
//! A policy is a list of selectors. Each selector may constrain:
//! - the object key (regular expression)
//! - required tags and user metadata
//! - a last-access date window
//! - tag keys that must be absent
//!
//! Policies are plain data; the filters in `bucketsweep-filters` compile
//! and evaluate them.

pub mod policy;
pub mod selector;

pub use policy::{Policy, POLICY_KIND};
pub use selector::{LastAccess, Selector};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::policy::Policy;
    pub use crate::selector::{LastAccess, Selector};
}
