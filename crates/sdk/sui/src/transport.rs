//! JSON-RPC transport backed by `sui-sdk`.
//!
//! `sign` turns a [`TransactionRequest`] into a single-command programmable
//! transaction and signs it with intent; its digest is known from then on.
//! `submit` executes it. Object arguments are looked up while signing: shared
//! objects (the registries) are passed as mutable shared inputs, everything
//! else by object reference.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use shared_crypto::intent::{Intent, IntentMessage};
use sui_json_rpc_types::{
    SuiExecutionStatus, SuiObjectDataOptions, SuiParsedData, SuiTransactionBlockEffectsAPI,
    SuiTransactionBlockResponse, SuiTransactionBlockResponseOptions,
};
use sui_sdk::{SuiClient, SuiClientBuilder};
use sui_types::Identifier;
use sui_types::base_types::{ObjectID, ObjectRef, SuiAddress};
use sui_types::digests::TransactionDigest;
use sui_types::object::Owner;
use sui_types::programmable_transaction_builder::ProgrammableTransactionBuilder;
use sui_types::quorum_driver_types::ExecuteTransactionRequestType;
use sui_types::transaction::{
    CallArg as SuiCallArg, ObjectArg, SharedObjectMutability, Transaction, TransactionData,
};

use drops_sdk_core::{
    CallArg, ChainTransport, DropsConfig, ExecutionResponse, ExecutionStatus, GasSummary,
    ObjectId, ObjectReader, ObjectSnapshot, TransactionEffects, TransactionRequest,
    TransportError, TxDigest, parse_object_changes,
};

use crate::signer::SuiSigner;

pub struct SuiTransport {
    client: SuiClient,
    gas_budget: u64,
    /// Responses already returned by `execute_transaction_block`, consumed by
    /// the first `fetch_result` for that digest.
    executed: Mutex<HashMap<TxDigest, ExecutionResponse>>,
}

impl SuiTransport {
    /// Connect to the fullnode named in `config`.
    pub async fn connect(config: &DropsConfig) -> Result<Self, TransportError> {
        tracing::info!("Connecting to Sui {} at {}", config.network, config.rpc_url);

        let client = SuiClientBuilder::default()
            .build(&config.rpc_url)
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self::new(client, config.gas_budget))
    }

    pub fn new(client: SuiClient, gas_budget: u64) -> Self {
        Self {
            client,
            gas_budget,
            executed: Mutex::new(HashMap::new()),
        }
    }

    pub fn client(&self) -> &SuiClient {
        &self.client
    }

    async fn build_transaction(
        &self,
        request: &TransactionRequest,
        sender: SuiAddress,
    ) -> anyhow::Result<TransactionData> {
        let mut ptb = ProgrammableTransactionBuilder::new();

        let mut arguments = Vec::with_capacity(request.arguments.len());
        for arg in &request.arguments {
            let argument = match arg {
                CallArg::Object(id) => ptb.input(self.object_input(id).await?)?,
                CallArg::Pure(pure) => {
                    let bytes = pure.to_bcs_bytes().with_context(|| {
                        format!("Failed to encode {} argument", pure.wire_type())
                    })?;
                    ptb.pure_bytes(bytes, false)
                }
            };
            arguments.push(argument);
        }

        let type_arguments = request
            .type_arguments
            .iter()
            .map(|t| {
                sui_types::parse_sui_type_tag(t)
                    .with_context(|| format!("Invalid type argument {}", t))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        ptb.programmable_move_call(
            parse_object_id(&request.target.package)?,
            Identifier::new(request.target.module.as_str())?,
            Identifier::new(request.target.function.as_str())?,
            type_arguments,
            arguments,
        );

        let pt = ptb.finish();

        let gas_price = self
            .client
            .read_api()
            .get_reference_gas_price()
            .await
            .context("Failed to get reference gas price")?;

        let gas_coin = self.gas_coin(sender).await?;

        Ok(TransactionData::new_programmable(
            sender,
            vec![gas_coin],
            pt,
            self.gas_budget,
            gas_price,
        ))
    }

    async fn object_input(&self, id: &ObjectId) -> anyhow::Result<SuiCallArg> {
        let object = self
            .client
            .read_api()
            .get_object_with_options(
                parse_object_id(id)?,
                SuiObjectDataOptions::new().with_owner(),
            )
            .await
            .with_context(|| format!("Failed to fetch object {}", id))?
            .into_object()
            .with_context(|| format!("Object {} not found", id))?;

        let arg = match &object.owner {
            Some(Owner::Shared {
                initial_shared_version,
            }) => {
                tracing::debug!(
                    "{} is shared (initial version {})",
                    id,
                    initial_shared_version.value()
                );
                ObjectArg::SharedObject {
                    id: object.object_id,
                    initial_shared_version: *initial_shared_version,
                    mutability: SharedObjectMutability::Mutable,
                }
            }
            _ => ObjectArg::ImmOrOwnedObject(object.object_ref()),
        };

        Ok(SuiCallArg::Object(arg))
    }

    async fn gas_coin(&self, owner: SuiAddress) -> anyhow::Result<ObjectRef> {
        let coins = self
            .client
            .coin_read_api()
            .get_coins(owner, None, None, None)
            .await
            .context("Failed to get gas coins")?;

        let coin = coins
            .data
            .first()
            .ok_or_else(|| anyhow!("No gas coins available for address {}", owner))?;

        tracing::debug!(
            "Using gas coin: {} with balance: {}",
            coin.coin_object_id,
            coin.balance
        );

        Ok(coin.object_ref())
    }

    fn cached(&self, digest: &TxDigest) -> Option<ExecutionResponse> {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(digest)
    }
}

#[async_trait]
impl ChainTransport for SuiTransport {
    type Signer = SuiSigner;
    type Signed = Transaction;

    async fn sign(
        &self,
        request: &TransactionRequest,
        signer: &SuiSigner,
    ) -> Result<Transaction, TransportError> {
        let tx_data = self
            .build_transaction(request, signer.sui_address())
            .await
            .map_err(|e| TransportError::Preparation(format!("{:#}", e)))?;

        let signature = sui_types::crypto::Signature::new_secure(
            &IntentMessage::new(Intent::sui_transaction(), &tx_data),
            signer.keypair(),
        );

        Ok(Transaction::from_data(tx_data, vec![signature]))
    }

    fn digest(&self, signed: &Transaction) -> TxDigest {
        TxDigest::new(signed.digest().to_string())
    }

    async fn submit(&self, signed: &Transaction) -> Result<(), TransportError> {
        tracing::debug!("Executing {}...", signed.digest());
        let response = self
            .client
            .quorum_driver_api()
            .execute_transaction_block(
                signed.clone(),
                response_options(),
                Some(ExecuteTransactionRequestType::WaitForLocalExecution),
            )
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let converted = convert_response(&response)?;
        if converted.effects.is_some() {
            self.executed
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .insert(converted.digest.clone(), converted);
        }

        Ok(())
    }

    async fn fetch_result(
        &self,
        digest: &TxDigest,
    ) -> Result<Option<ExecutionResponse>, TransportError> {
        if let Some(response) = self.cached(digest) {
            return Ok(Some(response));
        }

        let tx_digest: TransactionDigest = digest
            .as_str()
            .parse()
            .map_err(|e| TransportError::InvalidResponse(format!("bad digest {}: {}", digest, e)))?;

        match self
            .client
            .read_api()
            .get_transaction_with_options(tx_digest, response_options())
            .await
        {
            Ok(response) if response.effects.is_some() => convert_response(&response).map(Some),
            Ok(_) => Ok(None),
            Err(e) if is_not_found(&e.to_string()) => Ok(None),
            Err(e) => Err(TransportError::Network(e.to_string())),
        }
    }
}

#[async_trait]
impl ObjectReader for SuiTransport {
    async fn read_object(&self, object_id: &ObjectId) -> Result<ObjectSnapshot, TransportError> {
        let id = parse_object_id(object_id)
            .map_err(|e| TransportError::InvalidResponse(format!("{:#}", e)))?;

        let object = self
            .client
            .read_api()
            .get_object_with_options(id, SuiObjectDataOptions::new().with_type().with_content())
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?
            .into_object()
            .map_err(|_| TransportError::ObjectNotFound(object_id.clone()))?;

        match object.content {
            Some(SuiParsedData::MoveObject(move_obj)) => Ok(ObjectSnapshot {
                object_id: ObjectId::new(object.object_id.to_string()),
                object_type: move_obj.type_.to_string(),
                fields: move_obj.fields.to_json_value(),
            }),
            _ => Err(TransportError::InvalidResponse(format!(
                "{} is not a Move object",
                object_id
            ))),
        }
    }
}

fn response_options() -> SuiTransactionBlockResponseOptions {
    SuiTransactionBlockResponseOptions::new()
        .with_effects()
        .with_object_changes()
}

fn parse_object_id(id: &ObjectId) -> anyhow::Result<ObjectID> {
    ObjectID::from_hex_literal(id.as_str()).with_context(|| format!("Invalid object ID {}", id))
}

fn is_not_found(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("could not find") || message.contains("not found")
}

fn convert_response(
    response: &SuiTransactionBlockResponse,
) -> Result<ExecutionResponse, TransportError> {
    let effects = response.effects.as_ref().map(|effects| {
        let status = match effects.status() {
            SuiExecutionStatus::Success => ExecutionStatus::Success,
            SuiExecutionStatus::Failure { error } => ExecutionStatus::Failure {
                error: error.clone(),
            },
        };
        let gas = effects.gas_cost_summary();
        TransactionEffects {
            status,
            gas_used: GasSummary {
                computation_cost: gas.computation_cost,
                storage_cost: gas.storage_cost,
                storage_rebate: gas.storage_rebate,
            },
        }
    });

    let object_changes = match &response.object_changes {
        Some(changes) => {
            let raw = changes
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
            parse_object_changes(&raw)
        }
        None => Vec::new(),
    };

    Ok(ExecutionResponse {
        digest: TxDigest::new(response.digest.to_string()),
        effects,
        object_changes,
    })
}
