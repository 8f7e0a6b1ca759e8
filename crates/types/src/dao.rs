use ethers::abi::Token;
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// Constructor parameters for the DAO contract. The token dependency is not
/// part of the params; it is only known once the token deployment confirms
/// and is supplied at encoding time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DaoParams {
    pub curator: Address,
    pub proposal_deposit: U256,
}

impl DaoParams {
    /// ABI constructor arguments in declaration order:
    /// (curator, proposalDeposit, tokenAddress).
    pub fn constructor_args(&self, token: Address) -> Vec<Token> {
        vec![
            Token::Address(self.curator),
            Token::Uint(self.proposal_deposit),
            Token::Address(token),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_constructor_arg_is_the_token_address() {
        let params = DaoParams {
            curator: Address::zero(),
            proposal_deposit: U256::from(1000u64),
        };
        let token: Address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1"
            .parse()
            .unwrap();

        let args = params.constructor_args(token);
        assert_eq!(args.len(), 3);
        assert_eq!(args[0], Token::Address(Address::zero()));
        assert_eq!(args[1], Token::Uint(U256::from(1000u64)));
        assert_eq!(args[2], Token::Address(token));
    }
}
