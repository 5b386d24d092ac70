use alloy_primitives::U256;
use leptos::prelude::window;

pub fn alert(msg: impl AsRef<str>) {
    let _ = window().alert_with_message(msg.as_ref());
}

/// Converts a wei amount into the display denomination, trimming trailing
/// zeros but always keeping one fractional digit.
pub fn display_ether(wei: U256) -> String {
    let factor = U256::from(10u128.pow(18));

    let integer_part = wei / factor;
    let fractional_part = wei % factor;

    let fractional = format!("{:078}", fractional_part);
    let fractional = &fractional[fractional.len() - 18..];
    let trimmed = fractional.trim_end_matches('0');

    if trimmed.is_empty() {
        format!("{integer_part}.0")
    } else {
        format!("{integer_part}.{trimmed}")
    }
}

pub fn shorten_address(address: impl AsRef<str>) -> String {
    let address = address.as_ref();
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_ether_displays_as_one_point_zero() {
        assert_eq!(display_ether(U256::from(1_000_000_000_000_000_000u128)), "1.0");
    }

    #[test]
    fn fractions_trim_trailing_zeros() {
        assert_eq!(display_ether(U256::from(1_500_000_000_000_000_000u128)), "1.5");
        assert_eq!(display_ether(U256::from(1_000u128)), "0.000000000000001");
        assert_eq!(display_ether(U256::ZERO), "0.0");
    }

    #[test]
    fn addresses_shorten_for_display() {
        assert_eq!(
            shorten_address("0xa166a057B75161f4412608ffA5c97Ba7d10Fb66f"),
            "0xa166…b66f"
        );
        assert_eq!(shorten_address("0xAA"), "0xAA");
    }
}
