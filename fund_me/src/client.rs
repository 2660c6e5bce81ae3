use std::sync::Arc;

use anyhow::{Context, Result};
use ethers::{
    core::k256::ecdsa::SigningKey,
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::{coins_bip39::English, MnemonicBuilder, Signer, Wallet},
};

use crate::config::HarnessConfig;

pub type EtherSigner = SignerMiddleware<Provider<Http>, Wallet<SigningKey>>;

/// Signing client for account `index` of the configured mnemonic, bound to
/// the configured network's chain id.
pub fn get_signer_client(config: &HarnessConfig, index: u32) -> Result<Arc<EtherSigner>> {
    let wallet = MnemonicBuilder::<English>::default()
        .phrase(config.mnemonic.as_str())
        .index(index)?
        .build()
        .context("could not derive a wallet from the configured mnemonic")?
        .with_chain_id(config.network.chain_id);

    let provider = Provider::<Http>::try_from(&config.network.rpc_url)
        .with_context(|| format!("invalid RPC URL: {}", config.network.rpc_url))?;

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

/// Provider without signing capability, for reads.
pub fn get_read_only_client(rpc_url: &str) -> Result<Arc<Provider<Http>>> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .with_context(|| format!("invalid RPC URL: {rpc_url}"))?;
    Ok(Arc::new(provider))
}
