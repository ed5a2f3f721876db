use crate::chain::TxData;
use alloy_primitives::{Address, U256};
use thiserror::Error;

/// First 4 bytes of keccak256("approve(address,uint256)").
pub const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

const WORD: usize = 32;
const SELECTOR_LEN: usize = 4;

/// Decoded arguments of an `approve(address,uint256)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedApprove {
    pub spender: Address,
    pub amount: U256,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("call data is {0} bytes, need at least 68 for approve(address,uint256)")]
    TooShort(usize),
    #[error("argument section is {0} bytes, not a multiple of 32")]
    Misaligned(usize),
}

/// True iff the transaction can be an `approve` call: it has a destination
/// and its call data starts with the approve selector. Selector bytes are
/// compared raw; this never inspects the arguments.
pub fn is_approve_call(tx: &TxData) -> bool {
    tx.to.is_some()
        && tx.input.len() >= SELECTOR_LEN
        && tx.input[..SELECTOR_LEN] == APPROVE_SELECTOR
}

/// Fixed-layout decode of `approve(address,uint256)` call data (selector
/// included). The address word is read leniently: only the rightmost 20
/// bytes are significant, non-zero padding is ignored. Extra trailing words
/// are tolerated, a non-word-aligned tail is not.
pub fn decode_approve(input: &[u8]) -> Result<DecodedApprove, DecodeError> {
    if input.len() < SELECTOR_LEN + 2 * WORD {
        return Err(DecodeError::TooShort(input.len()));
    }
    let args = &input[SELECTOR_LEN..];
    if args.len() % WORD != 0 {
        return Err(DecodeError::Misaligned(args.len()));
    }

    let spender = Address::from_slice(&args[WORD - 20..WORD]);
    let amount = U256::from_be_slice(&args[WORD..2 * WORD]);
    Ok(DecodedApprove { spender, amount })
}
