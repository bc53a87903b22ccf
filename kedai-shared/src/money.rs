//! Rupiah amounts.
//!
//! The storefront sells in IDR, which has no minor unit in practice, so every
//! amount is a whole number of rupiah.

/// A non-negative amount in whole rupiah.
pub type Amount = u64;

/// ISO 4217 code of the store currency.
pub const CURRENCY: &str = "IDR";

/// Format an amount the way the storefront labels prices, e.g. `Rp 17.000`.
pub fn format_rupiah(amount: Amount) -> String {
    format!("Rp {}", group_thousands(amount))
}

/// Compact form used inside option labels, e.g. `Rp9.000`.
pub fn format_rupiah_compact(amount: Amount) -> String {
    format!("Rp{}", group_thousands(amount))
}

fn group_thousands(amount: Amount) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(900), "Rp 900");
        assert_eq!(format_rupiah(17000), "Rp 17.000");
        assert_eq!(format_rupiah(1250000), "Rp 1.250.000");
    }

    #[test]
    fn test_format_rupiah_compact() {
        assert_eq!(format_rupiah_compact(9000), "Rp9.000");
        assert_eq!(format_rupiah_compact(120000), "Rp120.000");
    }
}
