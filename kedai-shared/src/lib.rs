pub mod money;
pub mod pii;

pub use money::{format_rupiah, format_rupiah_compact, Amount, CURRENCY};
pub use pii::Masked;
