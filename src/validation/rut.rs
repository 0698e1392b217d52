//! Chilean RUT parsing and check-digit verification.
//!
//! Accepted spellings: `12.345.678-5`, `12345678-5`, `123456785`; `k`/`K`
//! both work for the check digit. The canonical form is `12345678-5`.

const MAX_BODY_DIGITS: usize = 8;

/// True when `rut` is well formed and its check digit matches.
pub fn verify_rut(rut: &str) -> bool {
    parse(rut).is_some()
}

/// Canonical `body-dv` spelling, or `None` for an invalid RUT.
pub fn normalize(rut: &str) -> Option<String> {
    parse(rut).map(|(body, dv)| format!("{body}-{dv}"))
}

/// Check digit for a RUT body: mod 11 over the reversed digits with weights 2..=7.
pub fn check_digit(body: u32) -> char {
    let mut sum = 0;
    let mut weight = 2;
    let mut rest = body;
    while rest > 0 {
        sum += (rest % 10) * weight;
        rest /= 10;
        weight = if weight == 7 { 2 } else { weight + 1 };
    }
    match 11 - sum % 11 {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}

fn parse(rut: &str) -> Option<(u32, char)> {
    let compact: String = rut.trim().chars().filter(|c| *c != '.').collect();
    let dv = compact.chars().last()?.to_ascii_uppercase();
    let body = &compact[..compact.len() - dv.len_utf8()];
    let body = body.strip_suffix('-').unwrap_or(body);

    if body.is_empty() || body.len() > MAX_BODY_DIGITS || !body.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let body: u32 = body.parse().ok()?;
    if body == 0 || check_digit(body) != dv {
        return None;
    }
    Some((body, dv))
}
