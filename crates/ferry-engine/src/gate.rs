//! Pre-flight funding gate.
//!
//! Checks transferable balance (plus the gas reserve when the transferred
//! asset pays for gas) and, for token routes, bridge allowance — issuing an
//! approval and waiting for its confirmation when needed. A failed gate
//! skips the unit; it never fails the run.

use ferry_config::{network, FundingSpec, RouteDefinition, WalletCredential, APPROVE_GAS};
use ferry_rpc::{erc20, RpcError, TxRequest};
use ferry_types::{bytes_to_hex, format_units, FerryError, Result};

use crate::events::EngineEvent;
use crate::Engine;

/// Gate-internal failure, keeping the timeout classification the retry
/// loop needs for rotation decisions.
struct GateError {
    timeout: bool,
    reason: String,
}

impl From<RpcError> for GateError {
    fn from(e: RpcError) -> Self {
        Self {
            timeout: e.is_timeout(),
            reason: e.to_string(),
        }
    }
}

impl From<FerryError> for GateError {
    fn from(e: FerryError) -> Self {
        Self {
            timeout: false,
            reason: e.to_string(),
        }
    }
}

type GateResult = std::result::Result<bool, GateError>;

impl Engine {
    /// Run the funding gate for one unit. `Ok(false)` means skip the unit;
    /// persistent RPC failures also resolve to a skip after the retry
    /// ceiling.
    pub(crate) async fn ensure_funded(
        &self,
        wallet: &WalletCredential,
        route: &RouteDefinition,
    ) -> Result<bool> {
        if matches!(route.funding, FundingSpec::None) {
            return Ok(true);
        }

        let ceiling = self.options.gate_retry_ceiling;
        for attempt in 1..=ceiling {
            let result = match route.funding {
                FundingSpec::Native { amount_wei } => {
                    self.native_funded(wallet, route, amount_wei).await
                }
                FundingSpec::Token { amount } => self.token_funded(wallet, route, amount).await,
                FundingSpec::None => return Ok(true),
            };

            match result {
                Ok(funded) => return Ok(funded),
                Err(gate_error) => {
                    if gate_error.timeout {
                        let pool = self.pool(route.source)?;
                        pool.rotate();
                        self.emit(EngineEvent::EndpointRotated {
                            network: pool.network(),
                            position: pool.position(),
                            pool_size: pool.len(),
                        });
                    }
                    self.emit(EngineEvent::GateError {
                        wallet: wallet.name.clone(),
                        attempt,
                        ceiling,
                        reason: gate_error.reason,
                    });
                    if attempt < ceiling {
                        self.pause(self.options.gate_retry_delay, "retrying funding check")
                            .await;
                    }
                }
            }
        }

        Ok(false)
    }

    async fn native_funded(
        &self,
        wallet: &WalletCredential,
        route: &RouteDefinition,
        amount_wei: u128,
    ) -> GateResult {
        let config = network(route.source);
        let pool = self.pool(route.source).map_err(GateError::from)?;
        let endpoint = pool.current();

        let balance = self.chain.get_balance(&endpoint, &wallet.address).await?;
        self.emit(EngineEvent::BalanceChecked {
            wallet: wallet.name.clone(),
            asset: config.native_symbol.to_string(),
            balance: format_units(balance, 18),
        });

        let required = amount_wei + config.gas_reserve;
        if balance < required {
            self.emit(EngineEvent::GateInsufficient {
                wallet: wallet.name.clone(),
                asset: config.native_symbol.to_string(),
                required: format_units(required, 18),
                available: format_units(balance, 18),
            });
            return Ok(false);
        }
        Ok(true)
    }

    async fn token_funded(
        &self,
        wallet: &WalletCredential,
        route: &RouteDefinition,
        amount: u128,
    ) -> GateResult {
        let config = network(route.source);
        let token = config.token.clone().ok_or_else(|| GateError {
            timeout: false,
            reason: format!("{} has no transfer token configured", route.source),
        })?;
        let pool = self.pool(route.source).map_err(GateError::from)?;
        let endpoint = pool.current();

        let balance = self
            .chain
            .get_token_balance(&endpoint, &token.address, &wallet.address)
            .await?;
        self.emit(EngineEvent::BalanceChecked {
            wallet: wallet.name.clone(),
            asset: token.symbol.to_string(),
            balance: format_units(balance, token.decimals),
        });

        if balance < amount {
            self.emit(EngineEvent::GateInsufficient {
                wallet: wallet.name.clone(),
                asset: token.symbol.to_string(),
                required: format_units(amount, token.decimals),
                available: format_units(balance, token.decimals),
            });
            return Ok(false);
        }

        let allowance = self
            .chain
            .get_allowance(
                &endpoint,
                &token.address,
                &wallet.address,
                &config.bridge_contract,
            )
            .await?;

        if allowance < amount {
            let data = erc20::encode_approve_max(&config.bridge_contract)?;
            let tx = TxRequest {
                to: token.address.clone(),
                value_wei: 0,
                data: bytes_to_hex(&data),
                gas: APPROVE_GAS,
            };
            let tx_hash = self.chain.send_transaction(&endpoint, wallet, &tx).await?;
            self.emit(EngineEvent::ApprovalSubmitted {
                wallet: wallet.name.clone(),
                tx_hash: tx_hash.clone(),
            });

            let waiter = self.receipt_waiter();
            waiter
                .await_receipt(self.chain.as_ref(), &pool, &tx_hash)
                .await?;
            self.emit(EngineEvent::ApprovalConfirmed {
                wallet: wallet.name.clone(),
                tx_hash,
            });
            self.pause(self.options.post_approve_delay, "letting approval settle")
                .await;
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use ferry_config::route;
    use ferry_indexer::MockIndexer;
    use ferry_rpc::{MockChainClient, Receipt};

    use crate::{Engine, EngineOptions};

    fn test_options() -> EngineOptions {
        EngineOptions {
            receipt_max_attempts: 3,
            receipt_interval: Duration::from_millis(1),
            indexing_max_attempts: 2,
            indexing_interval: Duration::from_millis(1),
            unit_retry_ceiling: 3,
            retry_delay: Duration::ZERO,
            gate_retry_ceiling: 3,
            gate_retry_delay: Duration::ZERO,
            post_approve_delay: Duration::ZERO,
            inter_op_delay: Duration::ZERO,
            cosmos_confirm_delay: Duration::ZERO,
        }
    }

    fn engine(mock: Arc<MockChainClient>) -> Engine {
        Engine::new(mock, Arc::new(MockIndexer::new()), test_options()).unwrap()
    }

    fn wallet() -> ferry_config::WalletCredential {
        ferry_config::WalletCredential::new(
            "Wallet1",
            "0xsecret",
            "0x1111111111111111111111111111111111111111",
            HashMap::new(),
        )
    }

    const SEPOLIA_USDC: &str = "0x1c7d4b196cb0c7b01d743fbc6116a902379c7238";
    const SEPOLIA_BRIDGE: &str = "0x5fbe74a283f7954f10aa04c2edf55578811aeb03";

    #[tokio::test]
    async fn test_token_gate_passes_with_balance_and_allowance() {
        let mock = Arc::new(MockChainClient::new());
        let wallet = wallet();
        mock.set_token_balance(SEPOLIA_USDC, &wallet.address, 20_000);
        mock.set_allowance(&wallet.address, SEPOLIA_BRIDGE, u128::MAX);
        let engine = engine(mock.clone());

        let funded = engine
            .ensure_funded(&wallet, &route(1).unwrap())
            .await
            .unwrap();
        assert!(funded);
        assert_eq!(mock.calls("send_transaction"), 0);
    }

    #[tokio::test]
    async fn test_token_gate_approves_when_allowance_low() {
        let mock = Arc::new(MockChainClient::new());
        let wallet = wallet();
        mock.set_token_balance(SEPOLIA_USDC, &wallet.address, 20_000);
        mock.script_submission(Ok("0xapproval".into()));
        mock.script_receipt(Ok(Some(Receipt {
            tx_hash: "0xapproval".into(),
            success: true,
            gas_used: 46_000,
        })));
        let engine = engine(mock.clone());

        let funded = engine
            .ensure_funded(&wallet, &route(1).unwrap())
            .await
            .unwrap();
        assert!(funded);
        assert_eq!(mock.calls("send_transaction"), 1);
        let approval = &mock.submitted()[0];
        assert_eq!(approval.to, SEPOLIA_USDC);
        assert_eq!(approval.value_wei, 0);
    }

    #[tokio::test]
    async fn test_native_gate_counts_reserve() {
        let mock = Arc::new(MockChainClient::new());
        let wallet = wallet();
        // route 7 moves 0.0002 BNB and reserves 0.005 for gas; fund just
        // below the sum
        mock.set_balance(&wallet.address, 5_100_000_000_000_000);
        let engine = engine(mock.clone());

        let funded = engine
            .ensure_funded(&wallet, &route(7).unwrap())
            .await
            .unwrap();
        assert!(!funded);
        assert_eq!(mock.calls("send_transaction"), 0);
    }

    #[tokio::test]
    async fn test_gate_skips_after_persistent_errors() {
        let mock = Arc::new(MockChainClient::new());
        let wallet = wallet();
        // no scripted submission and no balance: route 1 allowance is 0,
        // so the gate tries to approve and the submission fails each time
        mock.set_token_balance(SEPOLIA_USDC, &wallet.address, 20_000);
        let engine = engine(mock.clone());

        let funded = engine
            .ensure_funded(&wallet, &route(1).unwrap())
            .await
            .unwrap();
        assert!(!funded);
        assert_eq!(mock.calls("send_transaction"), 3);
    }
}
