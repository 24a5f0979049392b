//! Parameter type classification
//!
//! The decoder only understands a fixed set of Solidity types: integers and
//! addresses (scalar or single-level arrays), `bool`, `string`, `bytes`, and
//! `bytes32` (scalar or single-level arrays). Anything else, tuples and
//! fixed-point included, is rejected.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Allow-list of decodable parameter types
///
/// Integer widths are checked by digit count only; `uint999` passes here and
/// fails later when the payload is decoded.
const SUPPORTED_PATTERNS: [&str; 5] = [
    r"^(u?int[0-9]{0,3}|address)(\[[0-9]*\])?$",
    r"^bool$",
    r"^string$",
    r"^bytes$",
    r"^bytes32(\[[0-9]*\])?$",
];

static SUPPORTED_TYPES: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    SUPPORTED_PATTERNS.map(|pattern| Regex::new(pattern).expect("supported type pattern"))
});

/// Check whether a declared parameter type can be decoded
///
/// Matching is exact and case-sensitive. This never fails; callers decide
/// what an unsupported type means for them.
pub fn is_supported(ty: &str) -> bool {
    SUPPORTED_TYPES.iter().any(|re| re.is_match(ty))
}

/// Canonical spelling of a type for selector computation
///
/// `uint` and `int` without a width are aliases of `uint256` and `int256`,
/// also when used as an array element type.
pub fn canonical_type(ty: &str) -> Cow<'_, str> {
    let (base, suffix) = match ty.find('[') {
        Some(pos) => ty.split_at(pos),
        None => (ty, ""),
    };

    match base {
        "uint" => Cow::Owned(format!("uint256{}", suffix)),
        "int" => Cow::Owned(format!("int256{}", suffix)),
        _ => Cow::Borrowed(ty),
    }
}
