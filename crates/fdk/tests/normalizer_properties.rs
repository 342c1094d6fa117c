//! # Normalizer Properties
//!
//! Property tests for address normalization, curator fee bounds and gas
//! padding over generated inputs.

use fdk::prelude::*;
use proptest::prelude::*;

/// Re-cases the hex digits of an address according to `mask`.
fn recase(address: &Address, mask: &[bool]) -> String {
    let lower = address.to_checksum().to_ascii_lowercase();
    let mut out = String::from("0x");
    for (c, upper) in lower[2..].chars().zip(mask) {
        out.push(if *upper { c.to_ascii_uppercase() } else { c });
    }
    out
}

proptest! {
    #[test]
    fn prop_normalize_address_is_idempotent(bytes in any::<[u8; 20]>(), upper in any::<bool>()) {
        let address = Address::new(bytes);
        let input = if upper {
            format!("0x{}", hex::encode_upper(bytes))
        } else {
            hex::encode(bytes)
        };

        let once = normalize_address(&input).unwrap();
        let twice = normalize_address(&once.to_string()).unwrap();
        prop_assert_eq!(once, address);
        prop_assert_eq!(twice, once);
        prop_assert_eq!(once.to_string(), address.to_checksum());

        // the checksummed form carries no notice
        prop_assert!(inspect_address(&once.to_string()).unwrap().warning.is_none());
    }

    #[test]
    fn prop_mixed_case_must_match_checksum(
        bytes in any::<[u8; 20]>(),
        mask in proptest::collection::vec(any::<bool>(), 40),
    ) {
        let address = Address::new(bytes);
        let input = recase(&address, &mask);
        let has_lower = input[2..].chars().any(|c| c.is_ascii_lowercase());
        let has_upper = input[2..].chars().any(|c| c.is_ascii_uppercase());

        match inspect_address(&input) {
            Ok(check) => {
                prop_assert_eq!(check.address, address);
                prop_assert!(!(has_lower && has_upper) || input == address.to_checksum());
            }
            Err(ValidationError::InvalidAddress { input: rejected, .. }) => {
                prop_assert_eq!(rejected, input.clone());
                prop_assert!(has_lower && has_upper && input != address.to_checksum());
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    #[test]
    fn prop_fee_accepted_iff_within_bound(units in 0u64..=2_000_000u64) {
        // fee = units / 10^7
        let fee: Decimal = format!("0.{units:07}").parse().unwrap();
        let result = normalize_fee(&fee, FeeScale::Ether);
        if units <= 1_000_000 {
            let scaled = result.unwrap();
            prop_assert_eq!(scaled.value(), U256::from(units) * U256::exp10(11));
        } else {
            let is_fee_error = matches!(result, Err(ValidationError::InvalidCuratorFee { .. }));
            prop_assert!(is_fee_error);
        }
    }

    #[test]
    fn prop_negative_fees_rejected(units in 1u64..=1_000_000u64) {
        let fee: Decimal = format!("-0.{units:07}").parse().unwrap();
        let is_fee_error = matches!(
            normalize_fee(&fee, FeeScale::Milli),
            Err(ValidationError::InvalidCuratorFee { .. })
        );
        prop_assert!(is_fee_error);
    }

    #[test]
    fn prop_padding_is_exact_for_wide_estimates(high in any::<u64>(), low in any::<u64>()) {
        let estimate = U256::from((u128::from(high) << 64) | u128::from(low));
        prop_assert_eq!(
            pad_gas_estimate(estimate),
            estimate * U256::from(110u8) / U256::from(100u8)
        );
    }
}

#[test]
fn test_fee_boundaries() {
    for ok in ["0", "0.1", "0.10000000", "0.0999999"] {
        assert!(normalize_fee(&ok.parse().unwrap(), FeeScale::Ether).is_ok(), "{ok}");
    }
    for bad in ["0.1000001", "-0.0001", "0.2", "1"] {
        assert!(normalize_fee(&bad.parse().unwrap(), FeeScale::Ether).is_err(), "{bad}");
    }
}
