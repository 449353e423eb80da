//! XML Schema datatype vocabulary and canonical numeric forms
//!
//! The normalizers reproduce the canonical lexical forms rdf4j writes for
//! numeric literals, so CSV output matches its writer byte for byte. Each
//! returns `None` when the label is not a valid value of the type.

const NS: &str = "http://www.w3.org/2001/XMLSchema#";

pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";
pub const BYTE: &str = "http://www.w3.org/2001/XMLSchema#byte";
pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// Inclusive bounds of the integer-derived types. `None` means unbounded.
type Bounds = (Option<i128>, Option<i128>);

fn integer_bounds(datatype: &str) -> Option<Bounds> {
    let local = datatype.strip_prefix(NS)?;
    let bounds = match local {
        "integer" => (None, None),
        "long" => (Some(i64::MIN as i128), Some(i64::MAX as i128)),
        "int" => (Some(i32::MIN as i128), Some(i32::MAX as i128)),
        "short" => (Some(i16::MIN as i128), Some(i16::MAX as i128)),
        "byte" => (Some(i8::MIN as i128), Some(i8::MAX as i128)),
        "nonPositiveInteger" => (None, Some(0)),
        "negativeInteger" => (None, Some(-1)),
        "nonNegativeInteger" => (Some(0), None),
        "positiveInteger" => (Some(1), None),
        "unsignedLong" => (Some(0), Some(u64::MAX as i128)),
        "unsignedInt" => (Some(0), Some(u32::MAX as i128)),
        "unsignedShort" => (Some(0), Some(u16::MAX as i128)),
        "unsignedByte" => (Some(0), Some(u8::MAX as i128)),
        _ => return None,
    };
    Some(bounds)
}

/// Check if the datatype belongs to the integer family
pub fn is_integer_type(datatype: &str) -> bool {
    integer_bounds(datatype).is_some()
}

/// Canonical form of a numeric literal, or `None` when the datatype is not
/// numeric or the label does not normalize
pub fn normalize_numeric(label: &str, datatype: &str) -> Option<String> {
    if let Some(bounds) = integer_bounds(datatype) {
        normalize_integer(label, bounds)
    } else if datatype == DECIMAL {
        normalize_decimal(label)
    } else if datatype == DOUBLE {
        normalize_double(label)
    } else {
        None
    }
}

fn split_sign(value: &str) -> (bool, &str) {
    match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn normalize_integer(label: &str, (min, max): Bounds) -> Option<String> {
    let (negative, digits) = split_sign(label.trim());
    if digits.is_empty() || !all_digits(digits) {
        return None;
    }
    let digits = match digits.trim_start_matches('0') {
        "" => "0",
        d => d,
    };
    let normalized = if negative && digits != "0" {
        format!("-{}", digits)
    } else {
        digits.to_string()
    };

    if min.is_some() || max.is_some() {
        // Digit strings too long for i128 are out of every bounded range.
        let value: i128 = normalized.parse().ok()?;
        if min.is_some_and(|m| value < m) || max.is_some_and(|m| value > m) {
            return None;
        }
    }
    Some(normalized)
}

fn normalize_decimal(label: &str) -> Option<String> {
    let (negative, digits) = split_sign(label.trim());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        i => i,
    };
    let frac_part = match frac_part.trim_end_matches('0') {
        "" => "0",
        f => f,
    };
    let sign = if negative && (int_part, frac_part) != ("0", "0") {
        "-"
    } else {
        ""
    };
    Some(format!("{}{}.{}", sign, int_part, frac_part))
}

fn normalize_double(label: &str) -> Option<String> {
    let value = label.trim();
    match value {
        "INF" | "-INF" | "NaN" => return Some(value.to_string()),
        "+INF" => return Some("INF".to_string()),
        _ => {}
    }

    let (mantissa, exponent) = match value.find(['e', 'E']) {
        Some(idx) => (&value[..idx], &value[idx + 1..]),
        None => (value, "0"),
    };
    let mantissa = normalize_decimal(mantissa)?;
    let mut exponent: i64 = normalize_integer(exponent, (None, None))?.parse().ok()?;

    let (negative, digits) = split_sign(&mantissa);
    let (int_part, frac_part) = digits.split_once('.')?;

    // Shift the point so exactly one non-zero digit precedes it.
    let (lead, fraction) = if int_part == "0" {
        if frac_part == "0" {
            return Some("0.0E0".to_string());
        }
        let significant = frac_part.trim_start_matches('0');
        let shift = (frac_part.len() - significant.len() + 1) as i64;
        exponent = exponent.checked_sub(shift)?;
        let (lead, rest) = significant.split_at(1);
        (lead, rest.to_string())
    } else {
        exponent = exponent.checked_add((int_part.len() - 1) as i64)?;
        let (lead, int_rest) = int_part.split_at(1);
        let tail = if frac_part == "0" { "" } else { frac_part };
        (lead, format!("{}{}", int_rest, tail))
    };

    let fraction = match fraction.trim_end_matches('0') {
        "" => "0",
        f => f,
    };
    let sign = if negative { "-" } else { "" };
    let normalized = format!("{}{}.{}E{}", sign, lead, fraction, exponent);

    // The mantissa is non-zero here, so a zero result is an underflow.
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() && v != 0.0 => Some(normalized),
        _ => None,
    }
}
