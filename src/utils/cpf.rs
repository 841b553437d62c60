//! CPF (Brazilian individual taxpayer ID) validation and formatting
//!
//! A CPF is an 11-digit number whose last two digits are weighted checksums
//! over the leading nine. Validation is purely structural; it says nothing
//! about whether the number is actually registered.

/// Strip everything but ASCII digits from the input.
pub fn strip(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check whether the input is a structurally valid CPF.
///
/// Punctuation is stripped before validation. Rejects anything that is not
/// 11 digits long, the known-invalid all-identical sequences, and any string
/// whose check digits do not match the weighted checksums.
pub fn is_valid(input: &str) -> bool {
    let digits = strip(input);
    if digits.len() != 11 {
        return false;
    }

    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();

    // 000.000.000-00 through 999.999.999-99 with all digits equal are
    // arithmetically valid but blacklisted by the registry.
    if d.iter().all(|&digit| digit == d[0]) {
        return false;
    }

    check_digit(&d[..9], 10) == d[9] && second_check_digit(&d) == d[10]
}

/// First check digit: weights 10 down to 2 over the leading nine digits.
fn check_digit(digits: &[u32], start_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &digit)| digit * (start_weight - i as u32))
        .sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

/// Second check digit: weights 11 down to 3 over the leading nine digits,
/// plus the first check digit weighted by 2.
fn second_check_digit(d: &[u32]) -> u32 {
    let sum: u32 = d[..9]
        .iter()
        .enumerate()
        .map(|(i, &digit)| digit * (11 - i as u32))
        .sum::<u32>()
        + d[9] * 2;
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

/// Render a CPF as `XXX.XXX.XXX-XX`.
///
/// Pure display transform: it does not verify the checksums, only that the
/// stripped input has 11 digits. Formatting an already-formatted CPF yields
/// the same string.
pub fn format(input: &str) -> Option<String> {
    let digits = strip(input);
    if digits.len() != 11 {
        return None;
    }
    Some(format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VALID_SAMPLES: &[&str] = &[
        "529.982.247-25",
        "52998224725",
        "111.444.777-35",
        "123.456.789-09",
    ];

    #[test]
    fn accepts_known_good_samples() {
        for sample in VALID_SAMPLES {
            assert!(is_valid(sample), "expected {sample} to validate");
        }
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!is_valid(""));
        assert!(!is_valid("1234567890"));
        assert!(!is_valid("123456789012"));
        assert!(!is_valid("529.982.247-2"));
    }

    #[test]
    fn rejects_all_identical_sequences() {
        for digit in 0..=9 {
            let cpf: String = std::iter::repeat(char::from_digit(digit, 10).unwrap())
                .take(11)
                .collect();
            assert!(!is_valid(&cpf), "expected {cpf} to be rejected");
        }
    }

    #[test]
    fn rejects_identical_prefix_with_any_final_digit() {
        // Ten identical digits followed by anything: either the final digit
        // matches (all-identical, blacklisted) or the checksum fails.
        for last in 0..=9 {
            let cpf = format!("1111111111{last}");
            assert!(!is_valid(&cpf), "expected {cpf} to be rejected");
        }
    }

    #[test]
    fn rejects_corrupted_check_digits() {
        assert!(!is_valid("529.982.247-35"));
        assert!(!is_valid("529.982.247-24"));
        assert!(!is_valid("111.444.777-36"));
    }

    #[test]
    fn single_digit_flips_are_mostly_detected() {
        // Mod-11 checksums are weak: a flip is usually caught, but not
        // guaranteed to be. Assert broad coverage rather than universality.
        let base = "52998224725";
        let mut detected = 0;
        let mut total = 0;
        for pos in 0..11 {
            for replacement in 0..=9u32 {
                let original = base.as_bytes()[pos] - b'0';
                if u32::from(original) == replacement {
                    continue;
                }
                let mut flipped = base.to_string().into_bytes();
                flipped[pos] = b'0' + replacement as u8;
                let flipped = String::from_utf8(flipped).unwrap();
                total += 1;
                if !is_valid(&flipped) {
                    detected += 1;
                }
            }
        }
        assert!(
            detected * 10 >= total * 9,
            "checksum caught only {detected}/{total} single-digit flips"
        );
    }

    #[test]
    fn formats_to_standard_punctuation() {
        assert_eq!(format("52998224725").as_deref(), Some("529.982.247-25"));
        assert_eq!(format("529 982 247 25").as_deref(), Some("529.982.247-25"));
        assert_eq!(format("1234567890"), None);
    }

    #[test]
    fn formatting_is_idempotent() {
        let once = format("52998224725").unwrap();
        let twice = format(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn format_does_not_validate_checksums() {
        // Display transform only: a checksum-invalid number still formats.
        assert_eq!(format("52998224799").as_deref(), Some("529.982.247-99"));
    }

    proptest! {
        #[test]
        fn generated_cpfs_with_computed_check_digits_validate(prefix in proptest::collection::vec(0u32..10, 9)) {
            prop_assume!(!prefix.iter().all(|&d| d == prefix[0]));

            let first = check_digit(&prefix, 10);
            let mut full = prefix.clone();
            full.push(first);
            let second = second_check_digit(&full);
            full.push(second);

            let cpf: String = full
                .iter()
                .map(|&d| char::from_digit(d, 10).unwrap())
                .collect();
            prop_assert!(is_valid(&cpf));
        }

        #[test]
        fn arbitrary_strings_never_panic(input in ".*") {
            let _ = is_valid(&input);
            let _ = format(&input);
        }
    }
}
