//! Unique id generation for prompts, history snapshots, folders and tags

use serde::{Deserialize, Serialize};
use ulid::Ulid;
use uuid::Uuid;

/// Source of globally unique string ids
///
/// Implementations must never hand out the same id twice during the life of
/// a process. The format is up to the implementation.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

/// Random v4 UUIDs, e.g. `21173421-201f-4e56-87a0-8e13fc02f7e5`
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Lexicographically sortable ULIDs, e.g. `01ARZ3NDEKTSV4RRFFQ69G5FAV`
#[derive(Debug, Default, Clone, Copy)]
pub struct UlidIds;

impl IdGenerator for UlidIds {
    fn new_id(&self) -> String {
        Ulid::new().to_string()
    }
}

/// Id format selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdFormat {
    #[default]
    Uuid,
    Ulid,
}

impl IdFormat {
    /// Build the generator for this format
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            IdFormat::Uuid => Box::new(UuidIds),
            IdFormat::Ulid => Box::new(UlidIds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = UuidIds;
        let seen: HashSet<String> = (0..1000).map(|_| ids.new_id()).collect();
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_uuid_ids_are_full_length() {
        assert_eq!(UuidIds.new_id().len(), 36);
    }

    #[test]
    fn test_ulid_ids_are_unique() {
        let ids = UlidIds;
        let seen: HashSet<String> = (0..1000).map(|_| ids.new_id()).collect();
        assert_eq!(seen.len(), 1000);
        assert!(seen.iter().all(|id| id.len() == 26));
    }

    #[test]
    fn test_id_format_generator() {
        assert_eq!(IdFormat::Uuid.generator().new_id().len(), 36);
        assert_eq!(IdFormat::Ulid.generator().new_id().len(), 26);
    }
}
