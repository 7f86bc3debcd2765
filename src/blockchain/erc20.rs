// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 call encoding.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};

use crate::error::{WalletError, WalletResult};

// Define the ERC-20 interface using alloy's sol! macro
sol! {
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// Calldata for `transfer(to, amount)`:
/// selector `a9059cbb`, then `to` and `amount` each left-padded to 32 bytes.
pub fn encode_transfer(to: Address, amount: U256) -> Bytes {
    IERC20::transferCall { to, amount }.abi_encode().into()
}

/// Calldata for `balanceOf(account)`.
pub fn encode_balance_of(account: Address) -> Bytes {
    IERC20::balanceOfCall { account }.abi_encode().into()
}

/// Decode the return data of `balanceOf`.
pub fn decode_balance(data: &[u8]) -> WalletResult<U256> {
    IERC20::balanceOfCall::abi_decode_returns(data)
        .map_err(|e| WalletError::Network(format!("malformed balanceOf response: {e}")))
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{hex, keccak256};

    use super::*;

    #[test]
    fn transfer_selector_is_keccak_prefix() {
        let digest = keccak256("transfer(address,uint256)");
        assert_eq!(IERC20::transferCall::SELECTOR, digest[..4]);
        assert_eq!(IERC20::transferCall::SELECTOR, [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn interface_has_only_transfer_and_balance_of() {
        let selectors = IERC20::IERC20Calls::SELECTORS;
        assert_eq!(selectors.len(), 2);
        assert!(selectors.contains(&IERC20::transferCall::SELECTOR));
        assert!(selectors.contains(&IERC20::balanceOfCall::SELECTOR));
    }

    #[test]
    fn transfer_calldata_layout() {
        let to: Address = "0x3535353535353535353535353535353535353535".parse().unwrap();
        let amount = U256::from(1_500_000u64);

        let data = encode_transfer(to, amount);
        assert_eq!(data.len(), 4 + 32 + 32);

        let expected = hex::decode(concat!(
            "a9059cbb",
            "0000000000000000000000003535353535353535353535353535353535353535",
            "000000000000000000000000000000000000000000000000000000000016e360",
        ))
        .unwrap();
        assert_eq!(data.as_ref(), expected.as_slice());
    }

    #[test]
    fn balance_of_round_trip() {
        let account: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        let data = encode_balance_of(account);
        assert_eq!(&data[..4], &hex::decode("70a08231").unwrap()[..]);

        let mut ret = [0u8; 32];
        ret[31] = 42;
        assert_eq!(decode_balance(&ret).unwrap(), U256::from(42u64));
        assert!(decode_balance(&[1, 2, 3]).is_err());
    }
}
