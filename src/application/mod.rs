//! Registry operations and the batch use cases behind them.

pub mod services;
pub mod use_cases;
