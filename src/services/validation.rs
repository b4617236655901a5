//! Row validation and normalization.
//!
//! CSV rows and single-report submissions go through the same rules, so a
//! report looks the same no matter how it arrived.

use crate::error::ImportError;
use crate::models::{NewReport, RawRow, Region, SubmitReportRequest};

const MISSING_KEY: &str = "Missing ngoId or month";

/// Upper bound for stored counts. Keeps dashboard `SUM`s inside `i64`.
pub const MAX_COUNT: i64 = 1_000_000_000;

/// Upper bound for stored amounts. Keeps dashboard `SUM`s finite.
pub const MAX_AMOUNT: f64 = 1e15;

/// Validate one raw CSV row.
///
/// `default_region` is the job-level region from the upload form. It applies
/// only to rows whose own `region` cell is absent or empty.
pub fn validate_row(
    row: &RawRow,
    default_region: Option<Region>,
) -> Result<NewReport, ImportError> {
    let field = |name: &str| row.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    let (ngo_id, month) = match (field("ngoId"), field("month")) {
        (Some(ngo_id), Some(month)) => (ngo_id.to_string(), month.to_string()),
        _ => return Err(ImportError::Validation(MISSING_KEY.to_string())),
    };

    Ok(NewReport {
        ngo_id,
        month,
        people_helped: coerce_count(field("peopleHelped")),
        events_conducted: coerce_count(field("eventsConducted")),
        funds_utilized: coerce_amount(field("fundsUtilized")),
        region: resolve_region(field("region"), default_region)?,
    })
}

/// Validate a single-report submission.
pub fn validate_submission(request: &SubmitReportRequest) -> Result<NewReport, ImportError> {
    let non_empty = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let (ngo_id, month) = match (non_empty(&request.ngo_id), non_empty(&request.month)) {
        (Some(ngo_id), Some(month)) => (ngo_id, month),
        _ => return Err(ImportError::Validation(MISSING_KEY.to_string())),
    };

    Ok(NewReport {
        ngo_id,
        month,
        people_helped: clamp_count(request.people_helped.unwrap_or(0)),
        events_conducted: clamp_count(request.events_conducted.unwrap_or(0)),
        funds_utilized: clamp_amount(request.funds_utilized.unwrap_or(0.0)),
        region: resolve_region(non_empty(&request.region).as_deref(), None)?,
    })
}

fn resolve_region(
    value: Option<&str>,
    default_region: Option<Region>,
) -> Result<Region, ImportError> {
    match value {
        Some(value) => Region::parse(value)
            .ok_or_else(|| ImportError::Validation(format!("Invalid region: {}", value))),
        None => Ok(default_region.unwrap_or_default()),
    }
}

fn coerce_count(value: Option<&str>) -> i64 {
    clamp_count(value.and_then(parse_int_prefix).unwrap_or(0))
}

fn clamp_count(value: i64) -> i64 {
    value.clamp(0, MAX_COUNT)
}

fn coerce_amount(value: Option<&str>) -> f64 {
    clamp_amount(value.and_then(parse_float_prefix).unwrap_or(0.0))
}

fn clamp_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value.min(MAX_AMOUNT)
    } else {
        0.0
    }
}

/// Parse the leading base-10 integer of `s`, ignoring trailing garbage.
///
/// `"12abc"` is 12, `"1.9"` is 1, `"abc"` is `None`. Values past `i64` saturate.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));

    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the longest leading decimal float of `s`, ignoring trailing garbage.
///
/// Accepts an optional sign, digits with at most one `.`, and an exponent.
/// `"12.5kg"` is 12.5, `".5"` is 0.5, `"1e3"` is 1000, `"e3"` is `None`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            i = j;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'-' | b'+') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse::<f64>().ok()
}
