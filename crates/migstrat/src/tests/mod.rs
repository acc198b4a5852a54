mod test_strategies;
pub mod utils;
