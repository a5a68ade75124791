pub mod blockchain;

pub use blockchain::BlockchainTickerSource;
