//! Registry and object lookups.
//!
//! Reads go through [`ObjectReader`] and parse the Move struct fields the node
//! returns as JSON. Sui renders `u64` as a JSON string and narrower integers
//! as numbers, so every numeric field accepts both.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::DropsConfig;
use crate::error::RegistryError;
use crate::object_change::TypeFilter;
use crate::traits::{ObjectReader, ObjectSnapshot};
use crate::types::{Attributes, Collection, Drop, ObjectId};

/// Shared object listing every collection created through the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsRegistry {
    pub id: ObjectId,
    /// Collection IDs in creation order.
    pub ids: Vec<ObjectId>,
    pub counter: u64,
}

pub async fn fetch_collections_registry<R>(
    reader: &R,
    config: &DropsConfig,
) -> Result<CollectionsRegistry, RegistryError>
where
    R: ObjectReader + ?Sized,
{
    let snapshot = reader.read_object(&config.collections_registry_id).await?;
    expect_type(&snapshot, "CollectionsRegistry")?;

    let fields = &snapshot.fields;
    let ids = fields
        .get("ids")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid_field(&snapshot, "ids"))?
        .iter()
        .map(|v| id_value(v).ok_or_else(|| invalid_field(&snapshot, "ids")))
        .collect::<Result<Vec<_>, _>>()?;
    let counter = u64_field(&snapshot, "counter")?;

    tracing::debug!(
        "Collections registry {}: {} ids, counter {}",
        snapshot.object_id,
        ids.len(),
        counter
    );

    Ok(CollectionsRegistry {
        id: snapshot.object_id.clone(),
        ids,
        counter,
    })
}

pub async fn fetch_collection<R>(reader: &R, id: &ObjectId) -> Result<Collection, RegistryError>
where
    R: ObjectReader + ?Sized,
{
    let snapshot = reader.read_object(id).await?;
    expect_type(&snapshot, "Collection")?;

    let flags = u64_field(&snapshot, "flags")?;
    let flags = u16::try_from(flags).map_err(|_| invalid_field(&snapshot, "flags"))?;

    Ok(Collection {
        id: Some(snapshot.object_id.clone()),
        name: string_field(&snapshot, "name")?,
        description: string_field(&snapshot, "description")?,
        image: optional_string_field(&snapshot, "image"),
        attributes: attributes_field(&snapshot)?,
        flags,
        max_supply: u64_field(&snapshot, "max_supply")?,
        mint_start_time: u64_field(&snapshot, "mint_start_time")?,
        mint_stop_time: u64_field(&snapshot, "mint_stop_time")?,
    })
}

pub async fn fetch_drop<R>(reader: &R, id: &ObjectId) -> Result<Drop, RegistryError>
where
    R: ObjectReader + ?Sized,
{
    let snapshot = reader.read_object(id).await?;
    expect_type(&snapshot, "Drop")?;

    let collection_id = snapshot
        .fields
        .get("collection_id")
        .and_then(id_value)
        .ok_or_else(|| invalid_field(&snapshot, "collection_id"))?;

    let randomness = match snapshot.fields.get("randomness") {
        None | Some(Value::Null) => None,
        Some(_) => Some(u64_field(&snapshot, "randomness")?),
    };

    Ok(Drop {
        id: snapshot.object_id.clone(),
        collection_id,
        sequence_number: u64_field(&snapshot, "sequence_number")?,
        mint_timestamp: u64_field(&snapshot, "mint_timestamp")?,
        randomness,
        attributes: attributes_field(&snapshot)?,
    })
}

fn expect_type(snapshot: &ObjectSnapshot, struct_name: &str) -> Result<(), RegistryError> {
    if TypeFilter::new(struct_name).matches(&snapshot.object_type) {
        Ok(())
    } else {
        Err(RegistryError::UnexpectedType {
            object_id: snapshot.object_id.clone(),
            expected: struct_name.to_string(),
            found: snapshot.object_type.clone(),
        })
    }
}

fn invalid_field(snapshot: &ObjectSnapshot, field: &str) -> RegistryError {
    RegistryError::InvalidField {
        object_id: snapshot.object_id.clone(),
        field: field.to_string(),
    }
}

fn u64_field(snapshot: &ObjectSnapshot, field: &str) -> Result<u64, RegistryError> {
    snapshot
        .fields
        .get(field)
        .and_then(|v| v.as_u64().or_else(|| v.as_str()?.parse().ok()))
        .ok_or_else(|| invalid_field(snapshot, field))
}

fn string_field(snapshot: &ObjectSnapshot, field: &str) -> Result<String, RegistryError> {
    snapshot
        .fields
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| invalid_field(snapshot, field))
}

fn optional_string_field(snapshot: &ObjectSnapshot, field: &str) -> String {
    snapshot
        .fields
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// An ID is either a bare string or a `UID`-shaped `{ "id": "0x.." }`.
fn id_value(value: &Value) -> Option<ObjectId> {
    match value {
        Value::String(id) => Some(ObjectId::new(id.clone())),
        Value::Object(map) => map.get("id").and_then(id_value),
        _ => None,
    }
}

/// `VecMap<String, vector<String>>` renders as
/// `{ "contents": [{ "key": .., "value": [..] }] }`; a plain JSON object is
/// accepted too. Absent means no attributes.
fn attributes_field(snapshot: &ObjectSnapshot) -> Result<Attributes, RegistryError> {
    let Some(raw) = snapshot.fields.get("attributes") else {
        return Ok(Attributes::new());
    };

    let entries: Vec<(String, &Value)> = match raw.get("contents").and_then(Value::as_array) {
        Some(contents) => contents
            .iter()
            .map(|entry| {
                let key = entry.get("key").and_then(Value::as_str)?;
                Some((key.to_string(), entry.get("value")?))
            })
            .collect::<Option<_>>()
            .ok_or_else(|| invalid_field(snapshot, "attributes"))?,
        None => raw
            .as_object()
            .ok_or_else(|| invalid_field(snapshot, "attributes"))?
            .iter()
            .map(|(key, value)| (key.clone(), value))
            .collect(),
    };

    entries
        .into_iter()
        .map(|(key, value)| {
            let values = value
                .as_array()
                .and_then(|items| {
                    items
                        .iter()
                        .map(|item| item.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                })
                .ok_or_else(|| invalid_field(snapshot, "attributes"))?;
            Ok((key, values))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::builders::{CreateCollectionParams, MintDropParams, create_collection, mint_drop};
    use crate::error::TransportError;
    use crate::gateway::ExecutionGateway;
    use crate::mock::{MockSigner, MockTransport, sample_config};
    use crate::traits::SigningIdentity;

    fn snapshot(id: &str, object_type: &str, fields: Value) -> ObjectSnapshot {
        ObjectSnapshot {
            object_id: ObjectId::new(id),
            object_type: object_type.to_string(),
            fields,
        }
    }

    #[tokio::test]
    async fn registry_lists_created_collections() {
        let config = sample_config();
        let transport = MockTransport::new(&config);
        let gateway = ExecutionGateway::from_config(transport.clone(), &config);

        let mut created = Vec::new();
        for name in ["Harbor", "Lighthouse"] {
            let request = create_collection(
                &config,
                &CreateCollectionParams::new(name, "").with_max_supply(10),
            )
            .unwrap();
            let response = gateway.execute(&request, &MockSigner::default()).await.unwrap();
            created.extend(response.created_ids(None));
        }

        let registry = fetch_collections_registry(&transport, &config).await.unwrap();
        assert_eq!(registry.ids, created);
        assert_eq!(registry.counter, 2);
    }

    #[tokio::test]
    async fn collection_round_trips_through_chain_fields() {
        let config = sample_config();
        let transport = MockTransport::new(&config);
        let gateway = ExecutionGateway::from_config(transport.clone(), &config);

        let params = CreateCollectionParams::new("Harbor", "Tide pools")
            .with_flags(0b101)
            .with_max_supply(250)
            .with_mint_window(1_000, 9_007_199_254_740_991);
        let request = create_collection(&config, &params).unwrap();
        let id = gateway
            .execute(&request, &MockSigner::default())
            .await
            .unwrap()
            .created_ids(None)
            .remove(0);

        let collection = fetch_collection(&transport, &id).await.unwrap();
        assert_eq!(collection, params.into_collection(id).unwrap());
    }

    #[tokio::test]
    async fn drop_carries_collection_and_sequence() {
        let config = sample_config();
        let transport = MockTransport::new(&config);
        let gateway = ExecutionGateway::from_config(transport.clone(), &config);
        let signer = MockSigner::default();

        let request = create_collection(
            &config,
            &CreateCollectionParams::new("Harbor", "").with_max_supply(10),
        )
        .unwrap();
        let collection_id = gateway
            .execute(&request, &signer)
            .await
            .unwrap()
            .created_ids(None)
            .remove(0);

        let request = mint_drop(
            &config,
            &MintDropParams::new(collection_id.as_str(), signer.address()),
        )
        .unwrap();
        let drop_id = gateway
            .execute(&request, &signer)
            .await
            .unwrap()
            .created_ids(Some(&TypeFilter::new(config.drop_type())))
            .remove(0);

        let drop = fetch_drop(&transport, &drop_id).await.unwrap();
        assert_eq!(drop.collection_id, collection_id);
        assert_eq!(drop.sequence_number, 0);
        assert_eq!(drop.randomness, None);
    }

    #[tokio::test]
    async fn wrong_object_type_is_reported() {
        let config = sample_config();
        let transport = MockTransport::new(&config);

        let err = fetch_collection(&transport, &config.collections_registry_id)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnexpectedType { .. }));
    }

    #[tokio::test]
    async fn missing_object_surfaces_transport_error() {
        let transport = MockTransport::new(&sample_config());
        let err = fetch_collection(&transport, &ObjectId::new("0x404"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Transport(TransportError::ObjectNotFound(_))
        ));
    }

    #[tokio::test]
    async fn parses_vec_map_attributes_and_numeric_strings() {
        let transport = MockTransport::new(&sample_config());
        transport.insert_object(snapshot(
            "0xc0",
            "0xabc::collection::Collection",
            json!({
                "id": { "id": "0xc0" },
                "name": "Harbor",
                "description": "",
                "image": "ipfs://harbor",
                "flags": 3,
                "max_supply": "100",
                "mint_start_time": "1700000000000",
                "mint_stop_time": 1800000000000u64,
                "attributes": {
                    "contents": [
                        { "key": "tide", "value": ["low", "high"] },
                        { "key": "weather", "value": [] }
                    ]
                }
            }),
        ));

        let collection = fetch_collection(&transport, &ObjectId::new("0xc0"))
            .await
            .unwrap();

        assert_eq!(collection.image, "ipfs://harbor");
        assert_eq!(collection.max_supply, 100);
        assert_eq!(collection.mint_stop_time, 1_800_000_000_000);
        assert_eq!(
            collection.attributes.get("tide"),
            Some(&vec!["low".to_string(), "high".to_string()])
        );
        assert_eq!(collection.attributes.get("weather"), Some(&Vec::new()));
    }

    #[tokio::test]
    async fn malformed_fields_name_the_field() {
        let transport = MockTransport::new(&sample_config());
        transport.insert_object(snapshot(
            "0xc1",
            "0xabc::collection::Collection",
            json!({ "name": "Harbor", "description": "", "flags": 70000 }),
        ));

        let err = fetch_collection(&transport, &ObjectId::new("0xc1"))
            .await
            .unwrap_err();
        match err {
            RegistryError::InvalidField { field, .. } => assert_eq!(field, "flags"),
            other => panic!("expected invalid field, got {:?}", other),
        }
    }
}
