//! Transaction submission against the source network's active endpoint.

use ferry_config::{network, RouteDefinition, WalletCredential};
use ferry_rpc::TxRequest;
use ferry_types::{FerryError, Hex, Result};

use crate::events::EngineEvent;
use crate::Engine;

impl Engine {
    /// Submit one transfer transaction and return its hash. Any signing,
    /// RPC, or node-rejection failure surfaces as `Submission` with the
    /// reason string; there is no structured code beyond that.
    pub(crate) async fn submit_transfer(
        &self,
        wallet: &WalletCredential,
        route: &RouteDefinition,
        calldata: Hex,
    ) -> Result<Hex> {
        let config = network(route.source);
        let pool = self.pool(route.source)?;
        let endpoint = pool.current();

        let tx = TxRequest {
            to: config.bridge_contract.clone(),
            value_wei: route.value_wei,
            data: calldata,
            gas: route.gas,
        };

        let tx_hash = self
            .chain
            .send_transaction(&endpoint, wallet, &tx)
            .await
            .map_err(|e| FerryError::Submission(e.to_string()))?;

        self.emit(EngineEvent::Submitted {
            wallet: wallet.name.clone(),
            network: route.source,
            tx_hash: tx_hash.clone(),
        });

        Ok(tx_hash)
    }
}
