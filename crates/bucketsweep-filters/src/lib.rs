//! bucketsweep Filters
//!
//! Selects deletion candidates from a bucket listing according to a policy.
//!
//! Each filter handles one selector criterion:
//! - [`ObjectKeyFilter`]: `matchExpression` regular expressions
//! - [`TagFilter`]: required `tags`
//! - [`LastAccessFilter`]: `lastAccess` date windows
//! - [`MetadataFilter`]: required `objMetadata`
//! - [`WithoutTagKeysFilter`]: `withoutTagKeys`
//!
//! Within a filter, selectors are combined with OR. A policy that does not
//! mention a filter's criterion makes that filter select nothing, and a
//! malformed selector fails the whole invocation. Filters can be chained in
//! a [`FilterPipeline`] that either narrows or unions their results.
//!
//! Filters do no I/O and never modify the objects they are given.

pub mod compiler;
pub mod filter;
pub mod kind;
pub mod last_access;
pub mod metadata;
pub mod object_key;
pub mod pipeline;
pub mod tags;
pub mod window;

pub use compiler::{compile_key_patterns, key_patterns, KeyPattern};
pub use filter::{CompiledFilter, Filter, Predicate};
pub use kind::FilterKind;
pub use last_access::LastAccessFilter;
pub use metadata::MetadataFilter;
pub use object_key::ObjectKeyFilter;
pub use pipeline::{Composition, FilterPipeline, PipelineOutcome, StageReport};
pub use tags::{TagFilter, WithoutTagKeysFilter};
pub use window::TimeWindow;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::filter::Filter;
    pub use crate::kind::FilterKind;
    pub use crate::pipeline::{Composition, FilterPipeline};
    pub use crate::{
        LastAccessFilter, MetadataFilter, ObjectKeyFilter, TagFilter, WithoutTagKeysFilter,
    };
}
