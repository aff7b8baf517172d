//! Private-exponent screening.
//!
//! The bound checks are the Wiener and Boneh-Durfee conditions plus a
//! half-width floor; the shape checks (palindromes, tiled digit patterns,
//! proximity to a power of two, degenerate low bits) reject exponents whose
//! representation is too regular. The shape heuristics have no cryptanalytic
//! literature behind them and should be read as advisory.

use num_bigint::BigUint;
use num_traits::One;
use utils::BigUintExt;

/// Returns the failed heuristic for logging; `None` means `d` is usable.
pub(super) fn weakness(d: &BigUint, n: &BigUint) -> Option<&'static str> {
    if *d <= BigUintExt(n).nth_root(4) / 3u32 {
        return Some("wiener bound");
    }
    if *d <= (BigUint::one() << (n.bits() / 2)) {
        return Some("below the half-width margin");
    }
    if d.count_ones() * 4 < d.bits() {
        return Some("low hamming weight");
    }
    // n^0.3, conservatively computed as (n^(1/10))^3
    if *d <= BigUintExt(n).nth_root(10).pow(3) {
        return Some("boneh-durfee bound");
    }

    let (dec, bin) = (d.to_str_radix(10), d.to_str_radix(2));
    if is_palindrome(&dec) || is_palindrome(&bin) {
        return Some("palindromic digits");
    }
    if is_tiled(&dec) || is_tiled(&bin) {
        return Some("tiled digit pattern");
    }

    if near_power_of_two(d) {
        return Some("near a power of two");
    }

    let tail = d.iter_u64_digits().next().unwrap_or(0) & 0xffff;
    if tail == 0 || tail == 0xffff {
        return Some("degenerate low bits");
    }

    None
}

fn is_palindrome(s: &str) -> bool {
    s.bytes().eq(s.bytes().rev())
}

// a pattern of length >= 2 covering the whole string at least 3 times over
fn is_tiled(s: &str) -> bool {
    let s = s.as_bytes();
    for width in 2..=s.len() / 3 {
        if s.len() % width != 0 {
            continue;
        }

        let pattern = &s[..width];
        if s.chunks(width).all(|chunk| chunk == pattern) {
            return true;
        }
    }

    false
}

// |d - 2^k| < 2^16 against both neighboring powers
fn near_power_of_two(d: &BigUint) -> bool {
    let gap = BigUint::one() << 16;
    let below = BigUint::one() << (d.bits() - 1);
    let above = &below << 1;

    (d - &below) < gap || (&above - d) < gap
}
