//! String similarity primitives used by the artifact matcher.
//!
//! Two scores are provided:
//!
//! | Function | Scale | Meaning |
//! |----------|-------|---------|
//! | [`ratio`] | 0.0–1.0 | whole-string similarity, `2·M / T` |
//! | [`partial_ratio`] | 0–100 | best [`ratio`] of the shorter string against any aligned window of the longer one |
//!
//! `M` is the number of characters covered by the matching blocks: the
//! longest common substring is found first, then the same search recurses
//! into the pieces on either side of it. `T` is the combined length of
//! both strings. Both functions work on `char`s, not bytes, and expect
//! already-normalized input.

use std::collections::HashMap;

/// A run of `len` equal characters at `a[a_start..]` and `b[b_start..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// Whole-string similarity in `[0, 1]`.
///
/// Two empty strings are identical (`1.0`).
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    char_ratio(&a, &b)
}

/// Best alignment of the shorter string inside the longer one, in `0..=100`.
///
/// Returns 100 whenever the shorter string occurs verbatim in the longer
/// one, and 0 if either side is empty. Halves round to even.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    let mut best = 0.0_f64;
    for block in matching_blocks(shorter, longer) {
        let start = block.b_start.saturating_sub(block.a_start);
        let end = (start + shorter.len()).min(longer.len());
        let window = &longer[start..end];

        let r = char_ratio(shorter, window);
        if r > 0.995 {
            return 100;
        }
        best = best.max(r);
    }

    (best * 100.0).round_ties_even() as u8
}

/// Matching blocks of `a` against `b`, ordered by position, followed by a
/// zero-length sentinel at `(a.len(), b.len())`.
pub fn matching_blocks(a: &[char], b: &[char]) -> Vec<MatchingBlock> {
    let b2j = index_positions(b);

    let mut queue = vec![(0, a.len(), 0, b.len())];
    let mut found = Vec::new();
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let block = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if block.len == 0 {
            continue;
        }
        found.push(block);
        if alo < block.a_start && blo < block.b_start {
            queue.push((alo, block.a_start, blo, block.b_start));
        }
        let (i, j) = (block.a_start + block.len, block.b_start + block.len);
        if i < ahi && j < bhi {
            queue.push((i, ahi, j, bhi));
        }
    }
    found.sort_by_key(|m| (m.a_start, m.b_start));

    // Adjacent blocks are merged so each maximal run is reported once.
    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(found.len() + 1);
    for block in found {
        match merged.last_mut() {
            Some(prev)
                if prev.a_start + prev.len == block.a_start
                    && prev.b_start + prev.len == block.b_start =>
            {
                prev.len += block.len;
            }
            _ => merged.push(block),
        }
    }
    merged.push(MatchingBlock {
        a_start: a.len(),
        b_start: b.len(),
        len: 0,
    });
    merged
}

fn char_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = matching_blocks(a, b).iter().map(|m| m.len).sum();
    2.0 * matched as f64 / total as f64
}

fn index_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }
    b2j
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Among equally long runs the one starting earliest in `a` wins, then
/// the one starting earliest in `b`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchingBlock {
    let mut best = MatchingBlock {
        a_start: alo,
        b_start: blo,
        len: 0,
    };
    // run length of the match ending at b[j], for the previous row of a
    let mut prev_runs: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|p| prev_runs.get(&p))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                runs.insert(j, k);
                if k > best.len {
                    best = MatchingBlock {
                        a_start: i + 1 - k,
                        b_start: j + 1 - k,
                        len: k,
                    };
                }
            }
        }
        prev_runs = runs;
    }
    best
}
