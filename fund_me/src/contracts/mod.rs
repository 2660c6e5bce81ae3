pub mod fund_me;
pub mod mock_v3_aggregator;

pub use fund_me::FundMeContract;
pub use mock_v3_aggregator::MockV3AggregatorContract;

#[cfg(test)]
pub mod test_utils {
    use std::sync::Arc;

    use anyhow::Result;

    use crate::{
        client::{get_signer_client, EtherSigner},
        config::HarnessConfig,
    };

    /// Signing client for one of the local node's funded developer accounts.
    pub fn get_local_writer_client(index: u32) -> Result<Arc<EtherSigner>> {
        let config = HarnessConfig::load("localhost")?;
        get_signer_client(&config, index)
    }
}
