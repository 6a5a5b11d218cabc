// src/reconciler/mod.rs
//! Client-side list-state reconciler: pure derivations over fetched
//! collections (join, exclusion, search, filter, sort).

pub mod join;
pub mod query;

pub use join::{
    exclude_ids, exclude_linked, exclude_linked_for, exclude_present, join_map, Keyed, Link,
};
pub use query::{
    search, sort_items, CandidateFilters, CandidateQuery, ExperienceRange, Filter, ListQuery,
    RequirementFilters, RequirementQuery, Searchable, SortKey, SortOrder, SortSpec, Sortable,
};
