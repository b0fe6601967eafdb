//! Thousands-separator formatting for the amount fields.

/// Separator inserted between digit groups.
const SEPARATOR: char = ',';

/// Most fractional digits kept when formatting.
const MAX_FRACTION_DIGITS: usize = 3;

/// Remove every thousands separator.
pub fn strip_separators(text: &str) -> String {
    text.chars().filter(|&c| c != SEPARATOR).collect()
}

/// Re-render `text` with en-US thousands separators.
///
/// Existing separators are ignored. Returns `None` if what remains is not a
/// plain decimal number, in which case the caller leaves the text as typed.
/// Leading zeros are dropped and a trailing `.` is kept so a fraction can
/// still be typed. A fraction longer than three digits is rounded half-up to
/// three, with trailing zeros removed, the way `toLocaleString` shows it.
pub fn format_amount(text: &str) -> Option<String> {
    let raw = strip_separators(text);
    let raw = raw.trim();

    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
        return None;
    }
    if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
        return None;
    }

    let (int_digits, frac_digits) = match frac_part {
        Some(frac) if frac.len() > MAX_FRACTION_DIGITS => {
            let (int_digits, frac) = round_fraction(int_part, frac);
            // Rounding may consume the whole fraction
            (int_digits, Some(frac).filter(|f| !f.is_empty()))
        }
        _ => (int_part.to_string(), frac_part.map(str::to_string)),
    };

    let trimmed = int_digits.trim_start_matches('0');
    let digits = if trimmed.is_empty() { "0" } else { trimmed };

    let mut out = String::with_capacity(raw.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(digits));
    if let Some(frac) = frac_digits {
        out.push('.');
        out.push_str(&frac);
    }
    Some(out)
}

/// Round `int.frac` half-up to three fractional digits and drop trailing
/// zeros from the fraction. Carries may lengthen the integer part.
fn round_fraction(int_part: &str, frac: &str) -> (String, String) {
    let round_up = frac.as_bytes()[MAX_FRACTION_DIGITS] >= b'5';
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac.bytes().take(MAX_FRACTION_DIGITS))
        .map(|b| b - b'0')
        .collect();

    if round_up {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - MAX_FRACTION_DIGITS;
    let to_string = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    let int_digits = to_string(&digits[..split]);
    let frac_digits = to_string(&digits[split..]).trim_end_matches('0').to_string();
    (int_digits, frac_digits)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(SEPARATOR);
        }
        out.push(c);
    }
    out
}
