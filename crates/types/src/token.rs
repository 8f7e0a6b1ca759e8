use ethers::abi::Token;
use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// Constructor parameters for the token contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenParams {
    /// ABI constructor arguments in declaration order: (name, symbol, decimals).
    pub fn constructor_args(&self) -> Vec<Token> {
        vec![
            Token::String(self.name.clone()),
            Token::String(self.symbol.clone()),
            Token::Uint(U256::from(self.decimals)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_args_follow_declaration_order() {
        let params = TokenParams {
            name: "MotoClub".to_string(),
            symbol: "MC".to_string(),
            decimals: 18,
        };

        let args = params.constructor_args();
        assert_eq!(
            args,
            vec![
                Token::String("MotoClub".to_string()),
                Token::String("MC".to_string()),
                Token::Uint(U256::from(18u8)),
            ]
        );
    }
}
