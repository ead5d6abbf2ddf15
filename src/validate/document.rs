//! Registration-number validators: CNPJ (tax ID), CPF (person ID), and
//! CRECI-style license numbers.

/// The 27 first-level region codes (UF).
pub const REGION_CODES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Keep only ASCII digits.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strip license separators and uppercase.
pub fn normalize_license(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '.' | '/') && !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

pub(crate) fn all_same_digit(digits: &str) -> bool {
    let mut chars = digits.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}

fn to_digits(s: &str, len: usize) -> Option<Vec<u32>> {
    if s.len() != len {
        return None;
    }
    s.chars().map(|c| c.to_digit(10)).collect()
}

/// Check digit over `digits` with weights 2..=9 cycling from the rightmost
/// position.
fn cnpj_check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| d * (2 + (i as u32 % 8)))
        .sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

/// Check digit over `digits` with weights descending from `len + 1` to 2.
fn cpf_check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| d * (top - i as u32))
        .sum();
    match 11 - sum % 11 {
        10 | 11 => 0,
        r => r,
    }
}

/// Validate a 14-digit CNPJ given as bare digits.
pub fn is_valid_cnpj(digits: &str) -> bool {
    let Some(d) = to_digits(digits, 14) else {
        return false;
    };
    if all_same_digit(digits) {
        return false;
    }
    cnpj_check_digit(&d[..12]) == d[12] && cnpj_check_digit(&d[..13]) == d[13]
}

/// Validate an 11-digit CPF given as bare digits.
pub fn is_valid_cpf(digits: &str) -> bool {
    let Some(d) = to_digits(digits, 11) else {
        return false;
    };
    if all_same_digit(digits) {
        return false;
    }
    cpf_check_digit(&d[..9]) == d[9] && cpf_check_digit(&d[..10]) == d[10]
}

pub fn is_valid_region(code: &str) -> bool {
    let code = code.trim().to_uppercase();
    REGION_CODES.contains(&code.as_str())
}

/// Structural check only: at least three alphanumerics plus a known region.
pub fn is_valid_license(number: &str, region: &str) -> bool {
    let number = normalize_license(number);
    number.chars().count() >= 3
        && number.chars().all(|c| c.is_alphanumeric())
        && is_valid_region(region)
}

/// `00.000.000/0000-00`; anything that is not 14 digits is returned as-is.
pub fn format_cnpj(digits: &str) -> String {
    if digits.len() != 14 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return digits.to_string();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}

/// `000.000.000-00`; anything that is not 11 digits is returned as-is.
pub fn format_cpf(digits: &str) -> String {
    if digits.len() != 11 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return digits.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

/// `00000-000`
pub fn format_postal_code(digits: &str) -> String {
    if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return digits.to_string();
    }
    format!("{}-{}", &digits[0..5], &digits[5..8])
}

/// `(00) 00000-0000` for mobiles, `(00) 0000-0000` for landlines.
pub fn format_phone(digits: &str) -> String {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return digits.to_string();
    }
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[0..2], &digits[2..7], &digits[7..11]),
        10 => format!("({}) {}-{}", &digits[0..2], &digits[2..6], &digits[6..10]),
        _ => digits.to_string(),
    }
}
