//! Chain-level contract addresses and AMM reference pools

use alloy::primitives::{Address, address};

// BSC base and stable asset contracts
pub const WBNB: Address = address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c");
pub const BUSD: Address = address!("e9e7CEA3DedcA5984780Bafc599bD69ADd087D56");

/// Known AMMs and the WBNB/BUSD pool used as the triangulation reference.
pub const AMM_REFERENCE_POOLS: &[(&str, Address)] = &[
    ("pancakeswap", address!("58F876857a02D6762E0101bb5C46A8c1ED44Dc16")),
    ("pancakeswap-v1", address!("1B96B92314C44b159149f7E0303511fB2Fc4774f")),
    ("apeswap", address!("51e6D27FA57373d8d4C256231241053a70Cb1d93")),
];

pub fn amm_reference_pool(name: &str) -> Option<Address> {
    AMM_REFERENCE_POOLS
        .iter()
        .find(|(amm, _)| *amm == name)
        .map(|(_, pool)| *pool)
}
