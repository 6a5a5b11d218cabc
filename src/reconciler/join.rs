// src/reconciler/join.rs
//! Join and exclusion over two independently fetched collections.

use std::collections::{BTreeMap, HashSet};

use crate::types::{Application, Candidate, Requirement};

/// Entity with a unique integer id.
pub trait Keyed {
    fn key(&self) -> u64;
}

/// A `{subject_id, object_id}` pair from a relationship collection.
pub trait Link {
    fn subject_id(&self) -> u64;
    fn object_id(&self) -> u64;
}

impl Keyed for Candidate {
    fn key(&self) -> u64 {
        self.id
    }
}

impl Keyed for Requirement {
    fn key(&self) -> u64 {
        self.id
    }
}

impl Link for Application {
    fn subject_id(&self) -> u64 {
        self.candidate_id
    }

    fn object_id(&self) -> u64 {
        self.requirement_id
    }
}

impl Link for (u64, u64) {
    fn subject_id(&self) -> u64 {
        self.0
    }

    fn object_id(&self) -> u64 {
        self.1
    }
}

/// Map every primary id to the object ids linked to it, in relationship
/// order. Primary ids without links get an empty list; links whose subject
/// is not in `primary` are dropped.
pub fn join_map<P, L>(primary: &[P], links: &[L]) -> BTreeMap<u64, Vec<u64>>
where
    P: Keyed,
    L: Link,
{
    let mut joined: BTreeMap<u64, Vec<u64>> =
        primary.iter().map(|entity| (entity.key(), Vec::new())).collect();

    for link in links {
        if let Some(objects) = joined.get_mut(&link.subject_id()) {
            objects.push(link.object_id());
        }
    }

    joined
}

/// Drop every entity whose id is in `excluded`. Order is preserved.
pub fn exclude_ids<P>(primary: &[P], excluded: &HashSet<u64>) -> Vec<P>
where
    P: Keyed + Clone,
{
    primary
        .iter()
        .filter(|entity| !excluded.contains(&entity.key()))
        .cloned()
        .collect()
}

/// Primary list minus every entity that appears as an object of any link.
pub fn exclude_linked<P, L>(primary: &[P], links: &[L]) -> Vec<P>
where
    P: Keyed + Clone,
    L: Link,
{
    let linked: HashSet<u64> = links.iter().map(Link::object_id).collect();
    exclude_ids(primary, &linked)
}

/// Primary list minus the objects linked to one subject, e.g. the jobs a
/// given candidate has not applied to yet.
pub fn exclude_linked_for<P, L>(primary: &[P], links: &[L], subject: u64) -> Vec<P>
where
    P: Keyed + Clone,
    L: Link,
{
    let linked: HashSet<u64> = links
        .iter()
        .filter(|link| link.subject_id() == subject)
        .map(Link::object_id)
        .collect();
    exclude_ids(primary, &linked)
}

/// Primary list minus entities present (by id) in another entity list.
pub fn exclude_present<P, Q>(primary: &[P], present: &[Q]) -> Vec<P>
where
    P: Keyed + Clone,
    Q: Keyed,
{
    let ids: HashSet<u64> = present.iter().map(Keyed::key).collect();
    exclude_ids(primary, &ids)
}
