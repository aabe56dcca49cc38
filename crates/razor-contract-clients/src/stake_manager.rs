use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, U256},
    providers::Provider,
    sol,
};

sol!(
    #[sol(rpc, abi)]
    #[derive(Debug)]
    contract StakeManager {
        function bountyLocks(uint32 bountyId) external view returns (uint32 redeemAfter, address bountyHunter, uint256 amount);
        function redeemBounty(uint32 bountyId) external;

        // Pausable guard on redeemBounty; lock checks revert with reason strings
        error EnforcedPause();
    }
);

use StakeManager::StakeManagerInstance;

/// Raw bounty lock record as stored by the StakeManager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BountyLockRecord {
    pub redeem_after: u32,
    pub bounty_hunter: Address,
    pub amount: U256,
}

/// Client for the StakeManager contract
#[derive(Clone)]
pub struct StakeManagerClient<P: Provider + Clone> {
    contract: StakeManagerInstance<P>,
}

impl<P: Provider + Clone> StakeManagerClient<P> {
    pub fn new(provider: P, contract_address: Address) -> Self {
        let contract = StakeManagerInstance::new(contract_address, provider);
        Self { contract }
    }

    /// JSON ABI of the bound StakeManager interface
    pub fn abi() -> JsonAbi {
        StakeManager::abi::contract()
    }

    // ------------------------------------------------------------------------
    // View Functions
    // ------------------------------------------------------------------------

    /// Returns the lock record for a bounty
    pub async fn bounty_lock(&self, bounty_id: u32) -> Result<BountyLockRecord, alloy::contract::Error> {
        // Solidity: mapping(uint32 => Structs.BountyLock) public bountyLocks
        let lock = self.contract.bountyLocks(bounty_id).call().await?;
        Ok(BountyLockRecord {
            redeem_after: lock.redeemAfter,
            bounty_hunter: lock.bountyHunter,
            amount: lock.amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolError;

    #[test]
    fn test_abi_exposes_redeem_bounty() {
        let abi = StakeManagerClient::<alloy::providers::DynProvider>::abi();
        let redeem = abi.function("redeemBounty").expect("redeemBounty missing from ABI");
        assert_eq!(redeem[0].signature(), "redeemBounty(uint32)");
    }

    #[test]
    fn test_abi_declares_pause_error() {
        let abi = StakeManagerClient::<alloy::providers::DynProvider>::abi();
        let data = StakeManager::EnforcedPause {}.abi_encode();
        assert_eq!(
            crate::decode_revert_with_abi(&data, &abi),
            Some(crate::DecodedRevert::Contract {
                name: "EnforcedPause".to_string(),
                args: vec![],
            })
        );
    }

    #[test]
    fn test_abi_exposes_bounty_locks_getter() {
        let abi = StakeManagerClient::<alloy::providers::DynProvider>::abi();
        let getter = abi.function("bountyLocks").expect("bountyLocks missing from ABI");
        assert_eq!(getter[0].outputs.len(), 3);
    }
}
