//! Character classification for the Flix lexer.
//!
//! Identifiers split into two disjoint lexical classes by their first character:
//! - *alpha identifiers* start with a Unicode letter or letter number (looked up in the `unicode-xid` tables), `$`,
//!   `_`, or one of the modifier-letter ranges listed in [`IDENT_EXTRA`];
//! - *operator identifiers* are runs of [`is_operator_symbol`] characters: the ASCII operator set plus the Unicode
//!   math (`Sm`) and other (`So`) symbol ranges in [`SYMBOL_RANGES`].
//!
//! ## Notes
//! - All functions here are pure lookups; there is no state.
//! - `.` `,` `;` and brackets are never operator symbols.

use unicode_xid::UnicodeXID;

/// Modifier letters and marks that also start identifiers.
pub const IDENT_EXTRA: &[(char, char)] = &[
    ('\u{00AA}', '\u{00AA}'),
    ('\u{00BB}', '\u{00BB}'),
    ('\u{02B0}', '\u{02B8}'),
    ('\u{02C0}', '\u{02C1}'),
    ('\u{02E0}', '\u{02E4}'),
    ('\u{037A}', '\u{037A}'),
    ('\u{1D78}', '\u{1D78}'),
    ('\u{1D9B}', '\u{1DBF}'),
    ('\u{2071}', '\u{2071}'),
    ('\u{207F}', '\u{207F}'),
    ('\u{2090}', '\u{209C}'),
    ('\u{2C7C}', '\u{2C7D}'),
    ('\u{A69C}', '\u{A69D}'),
    ('\u{A770}', '\u{A770}'),
    ('\u{A7F8}', '\u{A7F9}'),
    ('\u{AB5C}', '\u{AB5F}'),
];

/// Non-ASCII math (`Sm`) and other (`So`) symbol ranges, sorted and disjoint.
pub const SYMBOL_RANGES: &[(char, char)] = &[
    ('\u{00A6}', '\u{00A6}'),
    ('\u{00A9}', '\u{00A9}'),
    ('\u{00AC}', '\u{00AC}'),
    ('\u{00AE}', '\u{00AE}'),
    ('\u{00B0}', '\u{00B1}'),
    ('\u{00D7}', '\u{00D7}'),
    ('\u{00F7}', '\u{00F7}'),
    ('\u{03F6}', '\u{03F6}'),
    ('\u{0482}', '\u{0482}'),
    ('\u{2044}', '\u{2044}'),
    ('\u{2052}', '\u{2052}'),
    ('\u{2100}', '\u{2101}'),
    ('\u{2103}', '\u{2106}'),
    ('\u{2108}', '\u{2109}'),
    ('\u{2114}', '\u{2114}'),
    ('\u{2116}', '\u{2118}'),
    ('\u{211E}', '\u{2123}'),
    ('\u{2125}', '\u{2125}'),
    ('\u{2127}', '\u{2127}'),
    ('\u{2129}', '\u{2129}'),
    ('\u{212E}', '\u{212E}'),
    ('\u{213A}', '\u{213B}'),
    ('\u{2140}', '\u{2144}'),
    ('\u{214A}', '\u{214D}'),
    ('\u{214F}', '\u{214F}'),
    ('\u{218A}', '\u{218B}'),
    ('\u{2190}', '\u{2307}'),
    ('\u{230C}', '\u{2328}'),
    ('\u{232B}', '\u{2426}'),
    ('\u{2440}', '\u{244A}'),
    ('\u{249C}', '\u{24E9}'),
    ('\u{2500}', '\u{2767}'),
    ('\u{2794}', '\u{27C4}'),
    ('\u{27C7}', '\u{27E5}'),
    ('\u{27F0}', '\u{2982}'),
    ('\u{2999}', '\u{29D7}'),
    ('\u{29DC}', '\u{29FB}'),
    ('\u{29FE}', '\u{2B73}'),
    ('\u{2B76}', '\u{2B95}'),
    ('\u{2B97}', '\u{2BFF}'),
    ('\u{2CE5}', '\u{2CEA}'),
    ('\u{2E80}', '\u{2E99}'),
    ('\u{2E9B}', '\u{2EF3}'),
    ('\u{2F00}', '\u{2FD5}'),
    ('\u{2FF0}', '\u{2FFB}'),
    ('\u{3004}', '\u{3004}'),
    ('\u{3012}', '\u{3013}'),
    ('\u{3020}', '\u{3020}'),
    ('\u{3036}', '\u{3037}'),
    ('\u{303E}', '\u{303F}'),
    ('\u{3190}', '\u{3191}'),
    ('\u{3196}', '\u{319F}'),
    ('\u{31C0}', '\u{31E3}'),
    ('\u{3200}', '\u{321E}'),
    ('\u{322A}', '\u{3247}'),
    ('\u{3250}', '\u{3250}'),
    ('\u{3260}', '\u{327F}'),
    ('\u{328A}', '\u{32B0}'),
    ('\u{32C0}', '\u{33FF}'),
    ('\u{4DC0}', '\u{4DFF}'),
    ('\u{A490}', '\u{A4C6}'),
    ('\u{A828}', '\u{A82B}'),
    ('\u{A836}', '\u{A839}'),
    ('\u{AA77}', '\u{AA79}'),
    ('\u{FB29}', '\u{FB29}'),
    ('\u{FDFD}', '\u{FDFD}'),
    ('\u{FE62}', '\u{FE62}'),
    ('\u{FE64}', '\u{FE66}'),
    ('\u{FF0B}', '\u{FF0B}'),
    ('\u{FF1C}', '\u{FF1E}'),
    ('\u{FF5C}', '\u{FF5C}'),
    ('\u{FF5E}', '\u{FF5E}'),
    ('\u{FFE2}', '\u{FFE2}'),
    ('\u{FFE4}', '\u{FFE4}'),
    ('\u{FFE8}', '\u{FFEE}'),
    ('\u{FFFC}', '\u{FFFD}'),
    ('\u{1D100}', '\u{1D126}'),
    ('\u{1D129}', '\u{1D164}'),
    ('\u{1D6C1}', '\u{1D6C1}'),
    ('\u{1D6DB}', '\u{1D6DB}'),
    ('\u{1D6FB}', '\u{1D6FB}'),
    ('\u{1D715}', '\u{1D715}'),
    ('\u{1D735}', '\u{1D735}'),
    ('\u{1F000}', '\u{1F02B}'),
    ('\u{1F030}', '\u{1F093}'),
    ('\u{1F0A0}', '\u{1F0F5}'),
    ('\u{1F300}', '\u{1F3FA}'),
    ('\u{1F400}', '\u{1F6D7}'),
    ('\u{1F700}', '\u{1F773}'),
    ('\u{1F780}', '\u{1F7D8}'),
    ('\u{1F800}', '\u{1F80B}'),
    ('\u{1F900}', '\u{1F9FF}'),
];

/// Whether `c` falls inside one of the sorted, disjoint `ranges`.
pub fn in_ranges(c: char, ranges: &[(char, char)]) -> bool {
    ranges
        .binary_search_by(|&(lo, hi)| {
            if hi < c {
                std::cmp::Ordering::Less
            } else if lo > c {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Whether `c` can start an alpha identifier.
pub fn is_ident_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_xid_start() || in_ranges(c, IDENT_EXTRA)
}

/// Whether `c` can continue an alpha identifier.
///
/// ## Notes
/// - Only ASCII digits continue identifiers; other Unicode digits do not.
pub fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// Whether `c` belongs to the operator-symbol class.
pub fn is_operator_symbol(c: char) -> bool {
    match c {
        '-' | '!' | '#' | '%' | '&' | '*' | '+' | '/' | '\\' | ':' | '<' | '=' | '>' | '?' | '@' | '^' | '|'
        | '~' => true,
        c if c.is_ascii() => false,
        c => in_ranges(c, SYMBOL_RANGES),
    }
}

/// Whether `c` is a prefix operator character (`+ - ! ~`).
pub fn is_prefix_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '!' | '~')
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Horizontal whitespace (newlines are tracked separately for layout).
pub fn is_horizontal_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000C}' | '\u{000B}')
}
