//! Stateless helper utilities used by the payslip reader and writer.

use crate::spec::{SpecColumnMapping, SpecResolvedColumnMapping};

////////////////////////////////////////////////////////////////////////////////
// #region MappingResolution

/// Resolve each mapping's `from` text against the header row.
///
/// The first header cell equal to `from` (exact, case-sensitive) wins. Blank
/// or unmatched `from` leaves the mapping unresolved; this is never an error.
pub fn resolve_column_mappings(
    mappings: &[SpecColumnMapping],
    header: &[Option<String>],
) -> Vec<SpecResolvedColumnMapping> {
    mappings
        .iter()
        .map(|mapping| {
            let col_idx = mapping
                .from
                .as_deref()
                .filter(|c_from| !is_blank(c_from))
                .and_then(|c_from| {
                    header
                        .iter()
                        .position(|c_title| c_title.as_deref() == Some(c_from))
                });
            SpecResolvedColumnMapping {
                from: mapping.from.clone(),
                to: mapping.to.clone(),
                col_idx,
            }
        })
        .collect()
}

/// Return labels of mappings that did not resolve to a source column.
pub fn select_unresolved_labels(mappings: &[SpecResolvedColumnMapping]) -> Vec<String> {
    mappings
        .iter()
        .filter(|mapping| mapping.col_idx.is_none())
        .map(|mapping| mapping.to.clone())
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region NumericFormatting

/// Render `x` as a fixed-point string with `n_scale` fractional digits.
///
/// Rounds half-up (away from zero) on the shortest decimal representation of
/// `x`, so `1234.565` gives `"1234.57"` rather than the binary-nearest
/// `"1234.56"`. A result that rounds to zero carries no sign.
pub fn format_decimal_half_up(x: f64, n_scale: usize) -> String {
    if !x.is_finite() {
        return x.to_string();
    }

    let c_repr = x.abs().to_string();
    let (c_int, c_frac) = c_repr.split_once('.').unwrap_or((c_repr.as_str(), ""));

    let mut l_digits: Vec<u8> = c_int.bytes().map(|b| b - b'0').collect();
    let n_frac_kept = usize::min(n_scale, c_frac.len());
    l_digits.extend(c_frac.bytes().take(n_frac_kept).map(|b| b - b'0'));
    l_digits.extend(std::iter::repeat_n(0, n_scale - n_frac_kept));

    let if_round_up = c_frac
        .as_bytes()
        .get(n_scale)
        .is_some_and(|b| *b >= b'5');
    if if_round_up {
        let mut if_carry = true;
        for digit in l_digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                if_carry = false;
                break;
            }
        }
        if if_carry {
            l_digits.insert(0, 1);
        }
    }

    let n_int_len = l_digits.len() - n_scale;
    let mut c_out = String::with_capacity(l_digits.len() + 2);
    if x.is_sign_negative() && l_digits.iter().any(|digit| *digit != 0) {
        c_out.push('-');
    }
    for (n_idx, digit) in l_digits.iter().enumerate() {
        if n_idx == n_int_len {
            c_out.push('.');
        }
        c_out.push(char::from(b'0' + digit));
    }
    c_out
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TextNormalization

/// True when `s` is empty or whitespace only.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
