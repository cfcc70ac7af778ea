use std::marker::PhantomData;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash},
    providers::Provider,
    rpc::types::eth::TransactionRequest,
    transports::{Transport, TransportError},
};

use crate::error::DeployError;

/// A contract that made it onchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployed {
    pub address: Address,
    pub transaction_hash: TxHash,
    pub gas_used: u128,
    pub effective_gas_price: u128,
}

/// The network a deployer publishes contracts to.
#[allow(async_fn_in_trait)]
pub trait Chain {
    /// Accounts that can send transactions.
    async fn accounts(&self) -> Result<Vec<Address>, DeployError>;

    async fn chain_id(&self) -> Result<u64, DeployError>;

    /// Sends a contract creation transaction and waits for it to be mined.
    async fn deploy(&self, from: Address, init_code: Bytes) -> Result<Deployed, DeployError>;
}

/// A [`Chain`] reached through a JSON-RPC provider.
pub struct RpcChain<P, T> {
    provider: P,
    signer: Option<Address>,
    _transport: PhantomData<T>,
}

impl<P, T> RpcChain<P, T>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    /// Sends transactions from the node's unlocked accounts.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            signer: None,
            _transport: PhantomData,
        }
    }

    /// Sends transactions from a local signer the provider was built with.
    pub fn with_signer(provider: P, signer: Address) -> Self {
        Self {
            provider,
            signer: Some(signer),
            _transport: PhantomData,
        }
    }
}

impl<P, T> Chain for RpcChain<P, T>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    async fn accounts(&self) -> Result<Vec<Address>, DeployError> {
        if let Some(signer) = self.signer {
            return Ok(vec![signer]);
        }

        self.provider.get_accounts().await.map_err(classify)
    }

    async fn chain_id(&self) -> Result<u64, DeployError> {
        self.provider.get_chain_id().await.map_err(classify)
    }

    async fn deploy(&self, from: Address, init_code: Bytes) -> Result<Deployed, DeployError> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .into_create()
            .with_input(init_code);
        let receipt = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(classify)?
            .get_receipt()
            .await
            .map_err(|e| DeployError::Transport(e.to_string()))?;

        settle(
            receipt.transaction_hash,
            receipt.status(),
            receipt.contract_address,
            receipt.gas_used,
            receipt.effective_gas_price,
        )
    }
}

/// Turns the fields of a mined creation receipt into a [`Deployed`].
fn settle(
    tx_hash: TxHash,
    success: bool,
    contract_address: Option<Address>,
    gas_used: u128,
    effective_gas_price: u128,
) -> Result<Deployed, DeployError> {
    if !success {
        return Err(DeployError::Reverted { tx_hash });
    }
    let address = contract_address.ok_or(DeployError::MissingAddress { tx_hash })?;

    Ok(Deployed {
        address,
        transaction_hash: tx_hash,
        gas_used,
        effective_gas_price,
    })
}

/// Node-side rejections carry a JSON-RPC error payload; anything else
/// never reached the node's transaction pool.
fn classify(e: TransportError) -> DeployError {
    match e.as_error_resp() {
        Some(payload) => DeployError::Rejected(payload.message.to_string()),
        None => DeployError::Transport(e.to_string()),
    }
}
