//! Small shared helpers: phone-number normalisation and OTP code generation.

use rand::{rngs::OsRng, Rng};

/// Width of every one-time passcode.
pub const OTP_CODE_LENGTH: usize = 6;

/// Generates a uniformly sampled, fixed-width numeric OTP code from the OS CSPRNG.
pub fn generate_otp_code() -> String {
    let code: u32 = OsRng.gen_range(0..1_000_000);
    format!("{code:06}")
}

/// Normalises a phone number to `+<digits>` form.
///
/// Accepts an optional leading `+` and ignores spaces, dashes, dots and parentheses. Returns
/// `None` when the result has fewer than 8 or more than 15 digits (E.164 bounds), or when any
/// other character is present.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let mut digits = String::with_capacity(raw.len());
    for (i, c) in raw.trim().chars().enumerate() {
        match c {
            '+' if i == 0 => {},
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {},
            _ => return None,
        }
    }
    if (8..=15).contains(&digits.len()) {
        Some(format!("+{digits}"))
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::{generate_otp_code, normalize_phone};

    #[test]
    fn otp_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()), "was: {code}");
        }
    }

    #[test]
    fn phone_numbers_normalize() {
        assert_eq!(normalize_phone("+55 11 99999-9999").as_deref(), Some("+5511999999999"));
        assert_eq!(normalize_phone("(11) 4002-8922").as_deref(), Some("+1140028922"));
        assert_eq!(normalize_phone("5511999999999").as_deref(), Some("+5511999999999"));
    }

    #[test]
    fn bad_phone_numbers_are_rejected() {
        assert!(normalize_phone("12345").is_none());
        assert!(normalize_phone("+55 11 9999x-9999").is_none());
        assert!(normalize_phone("11+4002").is_none());
        assert!(normalize_phone("12345678901234567").is_none());
    }
}
