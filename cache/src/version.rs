//! Debian-style version ordering.
//!
//! A version string is `[epoch:]upstream[-revision]`. Epochs compare
//! numerically; upstream and revision compare fragment-wise, alternating
//! non-digit and digit runs. Within a non-digit run, `~` sorts before
//! everything (including the end of the string), letters sort before
//! non-letters. Digit runs compare numerically with leading zeros ignored.

use crate::dep::{CompareOp, VersionConstraint};
use std::cmp::Ordering;

/// Compare two version strings under Debian ordering.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a_epoch, a_rest) = split_epoch(a);
    let (b_epoch, b_rest) = split_epoch(b);

    a_epoch
        .cmp(&b_epoch)
        .then_with(|| {
            let (a_up, _) = split_revision(a_rest);
            let (b_up, _) = split_revision(b_rest);
            compare_fragment(a_up, b_up)
        })
        .then_with(|| {
            let (_, a_rev) = split_revision(a_rest);
            let (_, b_rev) = split_revision(b_rest);
            compare_fragment(a_rev, b_rev)
        })
}

/// Whether `candidate` satisfies `constraint`.
pub fn check_dep(candidate: &str, constraint: &VersionConstraint) -> bool {
    let ord = compare_versions(candidate, &constraint.version);
    match constraint.op {
        CompareOp::Less => ord == Ordering::Less,
        CompareOp::LessEq => ord != Ordering::Greater,
        CompareOp::Equal => ord == Ordering::Equal,
        CompareOp::GreaterEq => ord != Ordering::Less,
        CompareOp::Greater => ord == Ordering::Greater,
    }
}

fn split_epoch(v: &str) -> (u64, &str) {
    if let Some((epoch, rest)) = v.split_once(':') {
        if let Ok(n) = epoch.parse::<u64>() {
            return (n, rest);
        }
    }
    (0, v)
}

fn split_revision(v: &str) -> (&str, &str) {
    match v.rsplit_once('-') {
        Some((upstream, revision)) => (upstream, revision),
        None => (v, ""),
    }
}

/// Sort weight of a byte within a non-digit run. The end of the string and
/// the start of a digit run both weigh 0, so `~` (weight -1) sorts before
/// either and a digit run sorts before any other symbol.
fn weight(b: Option<u8>) -> i32 {
    match b {
        None => 0,
        Some(b'~') => -1,
        Some(b) if b.is_ascii_digit() => 0,
        Some(b) if b.is_ascii_alphabetic() => i32::from(b),
        Some(b) => i32::from(b) + 256,
    }
}

fn compare_fragment(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        // Non-digit run.
        while (i < a.len() && !a[i].is_ascii_digit()) || (j < b.len() && !b[j].is_ascii_digit()) {
            let wa = weight(a.get(i).copied());
            let wb = weight(b.get(j).copied());
            if wa != wb {
                return wa.cmp(&wb);
            }
            i += 1;
            j += 1;
        }

        // Digit run: skip leading zeros, then the longer run of remaining
        // digits wins; equal-length runs compare at the first difference.
        while i < a.len() && a[i] == b'0' {
            i += 1;
        }
        while j < b.len() && b[j] == b'0' {
            j += 1;
        }

        let mut first_diff = Ordering::Equal;
        while i < a.len() && a[i].is_ascii_digit() && j < b.len() && b[j].is_ascii_digit() {
            if first_diff == Ordering::Equal {
                first_diff = a[i].cmp(&b[j]);
            }
            i += 1;
            j += 1;
        }
        if i < a.len() && a[i].is_ascii_digit() {
            return Ordering::Greater;
        }
        if j < b.len() && b[j].is_ascii_digit() {
            return Ordering::Less;
        }
        if first_diff != Ordering::Equal {
            return first_diff;
        }
    }

    Ordering::Equal
}
