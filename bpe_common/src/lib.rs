mod money;

pub mod op;

pub use money::{Money, MoneyConversionError, YUAN_CURRENCY_CODE, YUAN_CURRENCY_CODE_LOWER};
