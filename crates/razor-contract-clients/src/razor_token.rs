use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, U256},
    providers::Provider,
    sol,
};

sol!(
    #[sol(rpc, abi)]
    #[derive(Debug)]
    contract RAZOR {
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);

        // IERC20Errors (ERC-6093) raised by approve/transfer
        error ERC20InvalidApprover(address approver);
        error ERC20InvalidSpender(address spender);
        error ERC20InsufficientAllowance(address spender, uint256 allowance, uint256 needed);
        error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed);
    }
);

use RAZOR::RAZORInstance;

/// Client for the RAZOR ERC-20 token
#[derive(Clone)]
pub struct RazorTokenClient<P: Provider + Clone> {
    contract: RAZORInstance<P>,
}

impl<P: Provider + Clone> RazorTokenClient<P> {
    pub fn new(provider: P, contract_address: Address) -> Self {
        let contract = RAZORInstance::new(contract_address, provider);
        Self { contract }
    }

    /// JSON ABI of the bound token interface
    pub fn abi() -> JsonAbi {
        RAZOR::abi::contract()
    }

    // ------------------------------------------------------------------------
    // View Functions
    // ------------------------------------------------------------------------

    /// Returns how much `spender` may still transfer on behalf of `owner`
    pub async fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> Result<U256, alloy::contract::Error> {
        self.contract.allowance(owner, spender).call().await
    }

    /// Returns the token balance of an account
    pub async fn balance_of(&self, account: Address) -> Result<U256, alloy::contract::Error> {
        self.contract.balanceOf(account).call().await
    }
}
