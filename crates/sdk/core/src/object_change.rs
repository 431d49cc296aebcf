//! Object changes reported by the chain and the created-object resolver.
//!
//! The node reports changes as JSON objects tagged by `type`. They are modeled
//! as an exhaustive enum so call sites match on variants instead of comparing
//! strings. `objectId` / `objectType` are optional on the record: an entry
//! lacking an identifier still deserializes, and the resolver skips it.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::ObjectId;

/// Fields shared by object-level change entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// Owner, version, digest and anything the node adds later.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One entry of a transaction's `objectChanges`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ObjectChange {
    Created(ObjectRecord),
    Mutated(ObjectRecord),
    Deleted(ObjectRecord),
    Wrapped(ObjectRecord),
    Transferred(ObjectRecord),
    #[serde(rename_all = "camelCase")]
    Published {
        #[serde(default)]
        package_id: Option<ObjectId>,
        #[serde(default)]
        modules: Vec<String>,
        #[serde(flatten)]
        extra: BTreeMap<String, serde_json::Value>,
    },
}

/// Discriminant of an [`ObjectChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Mutated,
    Deleted,
    Wrapped,
    Transferred,
    Published,
}

impl ObjectChange {
    pub fn kind(&self) -> ChangeKind {
        match self {
            ObjectChange::Created(_) => ChangeKind::Created,
            ObjectChange::Mutated(_) => ChangeKind::Mutated,
            ObjectChange::Deleted(_) => ChangeKind::Deleted,
            ObjectChange::Wrapped(_) => ChangeKind::Wrapped,
            ObjectChange::Transferred(_) => ChangeKind::Transferred,
            ObjectChange::Published { .. } => ChangeKind::Published,
        }
    }

    /// Affected object, or the package for `published`.
    pub fn object_id(&self) -> Option<&ObjectId> {
        match self {
            ObjectChange::Created(record)
            | ObjectChange::Mutated(record)
            | ObjectChange::Deleted(record)
            | ObjectChange::Wrapped(record)
            | ObjectChange::Transferred(record) => record.object_id.as_ref(),
            ObjectChange::Published { package_id, .. } => package_id.as_ref(),
        }
    }

    pub fn object_type(&self) -> Option<&str> {
        match self {
            ObjectChange::Created(record)
            | ObjectChange::Mutated(record)
            | ObjectChange::Deleted(record)
            | ObjectChange::Wrapped(record)
            | ObjectChange::Transferred(record) => record.object_type.as_deref(),
            ObjectChange::Published { .. } => None,
        }
    }
}

/// Matches a declared object type.
///
/// A filter matches when it equals the full type, or equals its trailing
/// `module::Struct` path. Type parameters are ignored, so
/// `collection::Collection` matches `0xabc::collection::Collection<0x2::sui::SUI>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilter(String);

impl TypeFilter {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self(object_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, object_type: &str) -> bool {
        if object_type == self.0 {
            return true;
        }
        let base = object_type.split('<').next().unwrap_or(object_type);
        base == self.0
            || base
                .strip_suffix(self.0.as_str())
                .is_some_and(|prefix| prefix.ends_with("::"))
    }
}

/// Identifiers of newly created objects, in input order.
///
/// Pure and total: entries that are not `created`, do not match `filter`, or
/// lack an identifier are skipped. An empty input yields an empty list.
pub fn resolve_created(changes: &[ObjectChange], filter: Option<&TypeFilter>) -> Vec<ObjectId> {
    changes
        .iter()
        .filter_map(|change| match change {
            ObjectChange::Created(record) => Some(record),
            ObjectChange::Mutated(_)
            | ObjectChange::Deleted(_)
            | ObjectChange::Wrapped(_)
            | ObjectChange::Transferred(_)
            | ObjectChange::Published { .. } => None,
        })
        .filter(|record| match filter {
            None => true,
            Some(filter) => record
                .object_type
                .as_deref()
                .is_some_and(|object_type| filter.matches(object_type)),
        })
        .filter_map(|record| record.object_id.clone())
        .collect()
}

/// Parse raw JSON entries, dropping those that are not recognizable changes.
pub fn parse_object_changes(values: &[serde_json::Value]) -> Vec<ObjectChange> {
    values
        .iter()
        .filter_map(|value| match ObjectChange::deserialize(value) {
            Ok(change) => Some(change),
            Err(e) => {
                tracing::debug!("Skipping unrecognized object change: {}", e);
                None
            }
        })
        .collect()
}

/// Serde adapter: a list of changes where unrecognized entries are skipped.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Vec<ObjectChange>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(values
        .map(|values| parse_object_changes(&values))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const COLLECTION_TYPE: &str = "0xabc::collection::Collection";

    fn created(id: &str, object_type: &str) -> ObjectChange {
        ObjectChange::Created(ObjectRecord {
            object_id: Some(ObjectId::new(id)),
            object_type: Some(object_type.to_string()),
            ..Default::default()
        })
    }

    fn mutated(id: &str, object_type: &str) -> ObjectChange {
        ObjectChange::Mutated(ObjectRecord {
            object_id: Some(ObjectId::new(id)),
            object_type: Some(object_type.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn one_created_among_mutations() {
        let changes = vec![
            mutated("0x1", "0x2::coin::Coin<0x2::sui::SUI>"),
            created("0xc0", COLLECTION_TYPE),
            mutated("0x5", "0xabc::collection::CollectionsRegistry"),
        ];

        assert_eq!(resolve_created(&changes, None), vec![ObjectId::new("0xc0")]);
    }

    #[test]
    fn preserves_input_order() {
        let changes = vec![
            created("0x9", COLLECTION_TYPE),
            created("0x3", "0xabc::drop::Drop"),
            created("0x7", COLLECTION_TYPE),
        ];

        let ids = resolve_created(&changes, None);
        assert_eq!(
            ids,
            vec![ObjectId::new("0x9"), ObjectId::new("0x3"), ObjectId::new("0x7")]
        );
        assert_eq!(resolve_created(&changes, None), ids);
    }

    #[test]
    fn filters_by_declared_type() {
        let changes = vec![
            created("0x9", COLLECTION_TYPE),
            created("0x3", "0xabc::drop::Drop"),
        ];

        let by_suffix = TypeFilter::new("drop::Drop");
        assert_eq!(
            resolve_created(&changes, Some(&by_suffix)),
            vec![ObjectId::new("0x3")]
        );

        let exact = TypeFilter::new(COLLECTION_TYPE);
        assert_eq!(
            resolve_created(&changes, Some(&exact)),
            vec![ObjectId::new("0x9")]
        );
    }

    #[test]
    fn unmatched_filter_and_empty_input_yield_empty() {
        let changes = vec![created("0x9", COLLECTION_TYPE)];
        let none = TypeFilter::new("kiosk::Kiosk");

        assert!(resolve_created(&changes, Some(&none)).is_empty());
        assert!(resolve_created(&[], None).is_empty());
        assert!(resolve_created(&[], Some(&none)).is_empty());
    }

    #[test]
    fn entries_without_identifier_are_skipped() {
        let changes = vec![
            ObjectChange::Created(ObjectRecord {
                object_type: Some(COLLECTION_TYPE.to_string()),
                ..Default::default()
            }),
            created("0x4", COLLECTION_TYPE),
        ];

        assert_eq!(resolve_created(&changes, None), vec![ObjectId::new("0x4")]);
    }

    #[test]
    fn type_filter_requires_path_boundary() {
        let filter = TypeFilter::new("collection::Collection");

        assert!(filter.matches("0xabc::collection::Collection"));
        assert!(filter.matches("0xabc::collection::Collection<u64>"));
        assert!(!filter.matches("0xabc::subcollection::Collection"));
        assert!(!filter.matches("0xabc::collection::CollectionsRegistry"));
    }

    #[test]
    fn parses_node_json_shape() {
        let raw = json!([
            {
                "type": "mutated",
                "sender": "0xa11ce",
                "owner": { "AddressOwner": "0xa11ce" },
                "objectType": "0x2::coin::Coin<0x2::sui::SUI>",
                "objectId": "0x11",
                "version": "12",
                "previousVersion": "11",
                "digest": "HU5r"
            },
            {
                "type": "created",
                "sender": "0xa11ce",
                "owner": { "Shared": { "initial_shared_version": 12 } },
                "objectType": COLLECTION_TYPE,
                "objectId": "0x22",
                "version": "12",
                "digest": "7fQa"
            },
            { "type": "created", "objectType": COLLECTION_TYPE },
            { "type": "published", "packageId": "0x33", "version": "1", "modules": ["collection"] },
            { "type": "somethingNew", "objectId": "0x44" }
        ]);

        let changes = parse_object_changes(raw.as_array().unwrap());

        assert_eq!(changes.len(), 4);
        assert_eq!(changes[0].kind(), ChangeKind::Mutated);
        assert_eq!(changes[1].object_type(), Some(COLLECTION_TYPE));
        assert_eq!(changes[3].object_id(), Some(&ObjectId::new("0x33")));
        assert_eq!(resolve_created(&changes, None), vec![ObjectId::new("0x22")]);

        if let ObjectChange::Created(record) = &changes[1] {
            assert_eq!(record.extra.get("version"), Some(&json!("12")));
        } else {
            panic!("expected created entry");
        }
    }
}
