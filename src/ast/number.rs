use num_traits::{Float, Num};
use std::borrow::Cow;
use std::fmt::Debug;

/// Numeric domain an expression is compiled for.
///
/// Any copyable `num_traits::Num` qualifies: floats, integers and complex
/// numbers. Division by zero is whatever the type itself does. Floats give
/// an infinity or NaN; primitive integers panic, both at evaluation and when
/// the optimizer folds a constant division.
pub trait Number: Num + Copy + Debug + Send + Sync + 'static {}

impl<T> Number for T where T: Num + Copy + Debug + Send + Sync + 'static {}

/// Numbers that support the default math function table.
pub trait Real: Number + Float {}

impl<T> Real for T where T: Number + Float {}

/// Whether `token` has the shape of a literal: ASCII digits with at most
/// one `.` or `,` separator.
pub fn is_numeric_literal(token: &str) -> bool {
    let mut separators = 0usize;
    let mut digits = 0usize;

    for c in token.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' | ',' => separators += 1,
            _ => return false,
        }
    }
    digits > 0 && separators <= 1
}

/// Scans a bare numeric token.
///
/// Signs are not part of a literal; the compiler rewrites them as
/// `0 - rest`. Integer domains reject a separator.
pub fn scan_number<N: Number>(token: &str) -> Option<N> {
    if !is_numeric_literal(token) {
        return None;
    }
    let literal = match token.contains(',') {
        true => Cow::Owned(token.replacen(',', ".", 1)),
        false => Cow::Borrowed(token),
    };
    N::from_str_radix(&literal, 10).ok()
}
