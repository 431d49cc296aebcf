//! In-memory chain for testing without network.
//!
//! [`MockTransport`] interprets the two drops calls well enough to exercise
//! the whole build → execute → resolve → read flow: `create` adds a
//! collection object and records it in the collections registry, `mint` adds
//! a drop with the collection's next sequence number. Every check runs before
//! any object is touched, so a rejected call leaves the state as it was.
//! Failure modes (rejection, transport error, stalled signing, unacknowledged
//! submission, failing reads, slow or missing finality) are switched on per
//! instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::builders::collection::CREATE_FUNCTION;
use crate::builders::drop::MINT_FUNCTION;
use crate::config::DropsConfig;
use crate::error::TransportError;
use crate::object_change::{ObjectChange, ObjectRecord};
use crate::response::{ExecutionResponse, ExecutionStatus, GasSummary, TransactionEffects};
use crate::traits::{ChainTransport, ObjectReader, ObjectSnapshot, SigningIdentity};
use crate::transaction::{CallArg, PureArg, TransactionRequest};
use crate::types::{ObjectId, TxDigest};

const GAS_COIN_TYPE: &str = "0x2::coin::Coin<0x2::sui::SUI>";

/// A valid configuration source for tests.
pub fn sample_vars() -> Vec<(String, String)> {
    [
        ("SUI_NETWORK", "testnet".to_string()),
        ("SUI_RPC_URL", "https://fullnode.testnet.sui.io:443".to_string()),
        ("DROPS_PACKAGE_ID", format!("0x{}", "d1".repeat(32))),
        ("DROPS_PACKAGE_NAME", "drops".to_string()),
        ("COLLECTION_MODULE_NAME", "collection".to_string()),
        ("DROP_MODULE_NAME", "drop".to_string()),
        ("COLLECTIONS_REGISTRY_ID", format!("0x{}", "c1".repeat(32))),
        ("ADDRESS_DROPS_REGISTRY_ID", format!("0x{}", "a7".repeat(32))),
        // flag byte + 32 zero bytes, base64
        (
            "USER_PRIVATE_KEY",
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_string(),
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

pub fn sample_config() -> DropsConfig {
    DropsConfig::from_vars(sample_vars()).expect("sample configuration is valid")
}

/// Signer that only carries an address.
#[derive(Debug, Clone)]
pub struct MockSigner {
    address: String,
}

impl MockSigner {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl Default for MockSigner {
    fn default() -> Self {
        Self::new("0xa11ce")
    }
}

impl SigningIdentity for MockSigner {
    fn address(&self) -> String {
        self.address.clone()
    }
}

/// When a submitted transaction becomes final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finality {
    /// Final once this many polls have reported it pending.
    AfterPolls(u32),
    Never,
}

#[derive(Debug, Clone)]
enum Scenario {
    Execute,
    Reject(String),
    FailSubmit(String),
    HangSign,
    HangSubmit,
}

/// Signed form of a request; the digest is fixed at signing time.
#[derive(Debug, Clone)]
pub struct MockSigned {
    digest: TxDigest,
    request: TransactionRequest,
    sender: String,
}

struct Pending {
    polls: u32,
    response: ExecutionResponse,
}

struct MockState {
    package_id: ObjectId,
    collection_type: String,
    drop_type: String,
    scenario: Scenario,
    finality: Finality,
    next_id: u64,
    signed: usize,
    last_signed: Option<TxDigest>,
    submit_attempts: usize,
    failing_reads: u32,
    read_error: String,
    submissions: Vec<TransactionRequest>,
    pending: HashMap<TxDigest, Pending>,
    objects: HashMap<ObjectId, ObjectSnapshot>,
}

/// Mock transport simulating a drops deployment in-memory.
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Empty registries at the IDs named in `config`; results are final on the
    /// first poll.
    pub fn new(config: &DropsConfig) -> Self {
        let mut objects = HashMap::new();

        let registry_type = format!(
            "{}::{}::CollectionsRegistry",
            config.package_id, config.collection_module
        );
        objects.insert(
            config.collections_registry_id.clone(),
            ObjectSnapshot {
                object_id: config.collections_registry_id.clone(),
                object_type: registry_type,
                fields: json!({
                    "id": { "id": config.collections_registry_id },
                    "ids": [],
                    "counter": "0",
                }),
            },
        );

        let drops_registry_type = format!(
            "{}::{}::AddressDropsRegistry",
            config.package_id, config.collection_module
        );
        objects.insert(
            config.address_drops_registry_id.clone(),
            ObjectSnapshot {
                object_id: config.address_drops_registry_id.clone(),
                object_type: drops_registry_type,
                fields: json!({
                    "id": { "id": config.address_drops_registry_id },
                    "drops": {},
                }),
            },
        );

        Self {
            state: Arc::new(Mutex::new(MockState {
                package_id: config.package_id.clone(),
                collection_type: config.collection_type(),
                drop_type: config.drop_type(),
                scenario: Scenario::Execute,
                finality: Finality::AfterPolls(0),
                next_id: 1,
                signed: 0,
                last_signed: None,
                submit_attempts: 0,
                failing_reads: 0,
                read_error: String::new(),
                submissions: Vec::new(),
                pending: HashMap::new(),
                objects,
            })),
        }
    }

    pub fn with_finality(self, finality: Finality) -> Self {
        self.state().finality = finality;
        self
    }

    /// Every submission is accepted and then fails with `error`.
    pub fn rejecting(self, error: impl Into<String>) -> Self {
        self.state().scenario = Scenario::Reject(error.into());
        self
    }

    /// Every submission fails with a network error.
    pub fn failing_submit(self, message: impl Into<String>) -> Self {
        self.state().scenario = Scenario::FailSubmit(message.into());
        self
    }

    /// Signing never completes, so nothing is sent.
    pub fn hanging_sign(self) -> Self {
        self.state().scenario = Scenario::HangSign;
        self
    }

    /// Submissions are never acknowledged.
    pub fn hanging_submit(self) -> Self {
        self.state().scenario = Scenario::HangSubmit;
        self
    }

    /// The next `count` reads of a transaction outcome fail with a network
    /// error before reads start succeeding.
    pub fn failing_reads(self, count: u32, message: impl Into<String>) -> Self {
        {
            let mut state = self.state();
            state.failing_reads = count;
            state.read_error = message.into();
        }
        self
    }

    pub fn insert_object(&self, snapshot: ObjectSnapshot) {
        self.state()
            .objects
            .insert(snapshot.object_id.clone(), snapshot);
    }

    /// Requests accepted by the node, in order.
    pub fn submissions(&self) -> Vec<TransactionRequest> {
        self.state().submissions.clone()
    }

    pub fn submit_attempts(&self) -> usize {
        self.state().submit_attempts
    }

    /// Digest of the most recently signed transaction.
    pub fn last_signed_digest(&self) -> Option<TxDigest> {
        self.state().last_signed.clone()
    }

    /// Number of `fetch_result` calls seen for `digest`.
    pub fn polls(&self, digest: &TxDigest) -> u32 {
        self.state()
            .pending
            .get(digest)
            .map(|pending| pending.polls)
            .unwrap_or(0)
    }

    pub fn sequence_number_of(&self, drop_id: &ObjectId) -> Option<u64> {
        self.state()
            .objects
            .get(drop_id)
            .and_then(|snapshot| snapshot.fields.get("sequence_number"))
            .and_then(|v| v.as_u64().or_else(|| v.as_str()?.parse().ok()))
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MockState {
    fn fresh_id(&mut self) -> ObjectId {
        let id = ObjectId::new(format!("0x{:064x}", self.next_id));
        self.next_id += 1;
        id
    }

    fn apply(
        &mut self,
        digest: TxDigest,
        request: &TransactionRequest,
        sender: &str,
    ) -> ExecutionResponse {
        let mut changes = vec![ObjectChange::Mutated(record(
            ObjectId::new("0x6a5"),
            GAS_COIN_TYPE,
            sender,
        ))];

        let rejection = match &self.scenario {
            Scenario::Reject(error) => Some(error.clone()),
            Scenario::Execute
            | Scenario::FailSubmit(_)
            | Scenario::HangSign
            | Scenario::HangSubmit => None,
        };

        let outcome = if let Some(error) = rejection {
            Err(error)
        } else if request.target.package != self.package_id {
            Err(format!("package {} not found", request.target.package))
        } else {
            match request.target.function.as_str() {
                CREATE_FUNCTION => self.create_collection(request, sender),
                MINT_FUNCTION => self.mint(request, sender),
                other => Err(format!("function {} not found", other)),
            }
        };

        let status = match outcome {
            Ok(applied) => {
                changes.extend(applied);
                ExecutionStatus::Success
            }
            Err(error) => ExecutionStatus::Failure { error },
        };

        ExecutionResponse {
            digest,
            effects: Some(TransactionEffects {
                status,
                gas_used: GasSummary {
                    computation_cost: 1_000_000,
                    storage_cost: 2_964_000,
                    storage_rebate: 978_120,
                },
            }),
            object_changes: changes,
        }
    }

    fn create_collection(
        &mut self,
        request: &TransactionRequest,
        sender: &str,
    ) -> Result<Vec<ObjectChange>, String> {
        let registry_id = object_arg(request, 0)?;
        let registry = self
            .objects
            .get(&registry_id)
            .cloned()
            .ok_or_else(|| format!("object {} not found", registry_id))?;

        let name = string_arg(request, 1)?;
        let description = string_arg(request, 2)?;
        let coords_lat = number_arg(request, 3)?;
        let coords_lon = number_arg(request, 4)?;
        let flags = number_arg(request, 5)?;
        let max_supply = number_arg(request, 6)?;
        let mint_start_time = number_arg(request, 7)?;
        let mint_stop_time = number_arg(request, 8)?;

        let id = self.fresh_id();
        self.objects.insert(
            id.clone(),
            ObjectSnapshot {
                object_id: id.clone(),
                object_type: self.collection_type.clone(),
                fields: json!({
                    "id": { "id": id },
                    "name": name,
                    "description": description,
                    "coords_lat": coords_lat,
                    "coords_lon": coords_lon,
                    "flags": flags,
                    "max_supply": max_supply.to_string(),
                    "mint_start_time": mint_start_time.to_string(),
                    "mint_stop_time": mint_stop_time.to_string(),
                    "minted": "0",
                }),
            },
        );

        let mut fields = registry.fields.clone();
        let counter = field_u64(&fields, "counter");
        if let Some(ids) = fields.get_mut("ids").and_then(Value::as_array_mut) {
            ids.push(json!(id));
        }
        fields["counter"] = json!((counter + 1).to_string());
        self.objects.insert(
            registry_id.clone(),
            ObjectSnapshot {
                fields,
                ..registry.clone()
            },
        );

        Ok(vec![
            ObjectChange::Created(record(id, &self.collection_type, sender)),
            ObjectChange::Mutated(record(registry_id, &registry.object_type, sender)),
        ])
    }

    fn mint(
        &mut self,
        request: &TransactionRequest,
        sender: &str,
    ) -> Result<Vec<ObjectChange>, String> {
        let registry_id = object_arg(request, 0)?;
        let collection_id = object_arg(request, 1)?;
        let recipient = match request.arguments.get(2).and_then(CallArg::as_pure) {
            Some(PureArg::Address(address)) => address.to_string(),
            _ => return Err("argument 2 must be an address".to_string()),
        };
        let coords_lat = number_arg(request, 3)?;
        let coords_lon = number_arg(request, 4)?;

        let registry_type = self
            .objects
            .get(&registry_id)
            .map(|snapshot| snapshot.object_type.clone())
            .ok_or_else(|| format!("object {} not found", registry_id))?;
        let mut collection = self
            .objects
            .get(&collection_id)
            .cloned()
            .ok_or_else(|| format!("object {} not found", collection_id))?;

        let sequence_number = field_u64(&collection.fields, "minted");
        let max_supply = field_u64(&collection.fields, "max_supply");
        if sequence_number >= max_supply {
            return Err(format!("collection {} is sold out", collection_id));
        }

        collection.fields["minted"] = json!((sequence_number + 1).to_string());
        let collection_type = collection.object_type.clone();
        self.objects.insert(collection_id.clone(), collection);

        let minted_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let id = self.fresh_id();
        self.objects.insert(
            id.clone(),
            ObjectSnapshot {
                object_id: id.clone(),
                object_type: self.drop_type.clone(),
                fields: json!({
                    "id": { "id": id },
                    "collection_id": collection_id,
                    "owner": recipient,
                    "sequence_number": sequence_number.to_string(),
                    "mint_timestamp": minted_at.to_string(),
                    "coords_lat": coords_lat,
                    "coords_lon": coords_lon,
                }),
            },
        );

        Ok(vec![
            ObjectChange::Created(record(id, &self.drop_type, sender)),
            ObjectChange::Mutated(record(collection_id, &collection_type, sender)),
            ObjectChange::Mutated(record(registry_id, &registry_type, sender)),
        ])
    }
}

#[async_trait]
impl ChainTransport for MockTransport {
    type Signer = MockSigner;
    type Signed = MockSigned;

    async fn sign(
        &self,
        request: &TransactionRequest,
        signer: &MockSigner,
    ) -> Result<MockSigned, TransportError> {
        {
            let mut state = self.state();
            if !matches!(state.scenario, Scenario::HangSign) {
                let digest = TxDigest::new(format!("MockTx{}", state.signed));
                state.signed += 1;
                state.last_signed = Some(digest.clone());
                return Ok(MockSigned {
                    digest,
                    request: request.clone(),
                    sender: signer.address(),
                });
            }
        }

        std::future::pending().await
    }

    fn digest(&self, signed: &MockSigned) -> TxDigest {
        signed.digest.clone()
    }

    async fn submit(&self, signed: &MockSigned) -> Result<(), TransportError> {
        {
            let mut state = self.state();
            state.submit_attempts += 1;
            match state.scenario.clone() {
                Scenario::FailSubmit(message) => return Err(TransportError::Network(message)),
                Scenario::Execute | Scenario::Reject(_) => {
                    let response =
                        state.apply(signed.digest.clone(), &signed.request, &signed.sender);
                    state.submissions.push(signed.request.clone());
                    state
                        .pending
                        .insert(signed.digest.clone(), Pending { polls: 0, response });
                    return Ok(());
                }
                Scenario::HangSign | Scenario::HangSubmit => {}
            }
        }

        std::future::pending().await
    }

    async fn fetch_result(
        &self,
        digest: &TxDigest,
    ) -> Result<Option<ExecutionResponse>, TransportError> {
        let mut state = self.state();
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(TransportError::Network(state.read_error.clone()));
        }

        let finality = state.finality;
        let pending = state
            .pending
            .get_mut(digest)
            .ok_or_else(|| TransportError::InvalidResponse(format!("unknown digest {}", digest)))?;

        pending.polls += 1;
        let ready = match finality {
            Finality::AfterPolls(n) => pending.polls > n,
            Finality::Never => false,
        };

        Ok(ready.then(|| pending.response.clone()))
    }
}

#[async_trait]
impl ObjectReader for MockTransport {
    async fn read_object(&self, object_id: &ObjectId) -> Result<ObjectSnapshot, TransportError> {
        self.state()
            .objects
            .get(object_id)
            .cloned()
            .ok_or_else(|| TransportError::ObjectNotFound(object_id.clone()))
    }
}

fn record(id: ObjectId, object_type: &str, sender: &str) -> ObjectRecord {
    ObjectRecord {
        object_id: Some(id),
        object_type: Some(object_type.to_string()),
        sender: Some(sender.to_string()),
        ..Default::default()
    }
}

fn object_arg(request: &TransactionRequest, index: usize) -> Result<ObjectId, String> {
    request
        .arguments
        .get(index)
        .and_then(CallArg::as_object)
        .cloned()
        .ok_or_else(|| format!("argument {} must be an object", index))
}

fn string_arg(request: &TransactionRequest, index: usize) -> Result<String, String> {
    match request.arguments.get(index).and_then(CallArg::as_pure) {
        Some(PureArg::String(value)) => Ok(value.clone()),
        _ => Err(format!("argument {} must be a string", index)),
    }
}

fn number_arg(request: &TransactionRequest, index: usize) -> Result<u64, String> {
    match request.arguments.get(index).and_then(CallArg::as_pure) {
        Some(PureArg::U8(v)) => Ok(u64::from(*v)),
        Some(PureArg::U16(v)) => Ok(u64::from(*v)),
        Some(PureArg::U32(v)) => Ok(u64::from(*v)),
        Some(PureArg::U64(v)) => Ok(*v),
        _ => Err(format!("argument {} must be an integer", index)),
    }
}

fn field_u64(fields: &Value, name: &str) -> u64 {
    fields
        .get(name)
        .and_then(|v| v.as_u64().or_else(|| v.as_str()?.parse().ok()))
        .unwrap_or(0)
}
