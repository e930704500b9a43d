use std::collections::BTreeMap;

use crate::index::{DocRecord, InvertedIndex, Offset, Postings, Term};

/// Default cap on how long a repeated substring can grow.
pub const MAX_SUBSTRING_LEN: usize = 100;

/// Knobs for a repeat search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Longest substring length to consider.
    pub max_len: usize,
    /// Compare the non-overlapping occurrence count (instead of the raw
    /// offset-list length) against each document's required count when
    /// detecting exact matches.
    pub exact_nonoverlapping: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_len: MAX_SUBSTRING_LEN,
            exact_nonoverlapping: false,
        }
    }
}

/// Outcome of a repeat search over one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatsResults {
    /// True when some pass produced no survivors; false when the search hit
    /// the length cap first.
    pub converged: bool,
    /// The longest surviving terms, lexicographically sorted.
    pub longest: Vec<Term>,
    /// Terms whose occurrence counts equalled the per-document requirements
    /// exactly, at the greatest length where any did.
    pub exact: Vec<Term>,
}

/// Offsets of the string s+b in one document, where `strings` holds the
/// sorted offsets of s (length `m`) and `bytes` the sorted offsets of b.
/// An offset o is emitted when o is in `strings` and o+m is in `bytes`.
///
/// Two cursors walk the lists comparing `bytes[ib]` against
/// `strings[is] + m`. When the byte list is much denser than the string
/// list the byte cursor advances by fixed-step galloping (step = next
/// power of two at or above the density ratio) with a linear finish;
/// below a ratio of 8 the probe overhead costs more than it saves and
/// both cursors advance linearly. The string cursor always advances
/// linearly. Emits happen in `is` order, so the output stays sorted.
pub fn extend_offsets(strings: &[Offset], m: Offset, bytes: &[Offset]) -> Vec<Offset> {
    let mut sb = Vec::new();
    if strings.is_empty() || bytes.is_empty() {
        return sb;
    }

    let mut is = 0;
    let mut ib = 0;
    let ratio = bytes.len() as f64 / strings.len() as f64;

    if ratio < 8.0 {
        while is < strings.len() && ib < bytes.len() {
            let target = strings[is] + m;
            if bytes[ib] == target {
                sb.push(strings[is]);
                is += 1;
            } else if bytes[ib] < target {
                while ib < bytes.len() && bytes[ib] < target {
                    ib += 1;
                }
            } else {
                let back = bytes[ib] - m;
                while is < strings.len() && strings[is] < back {
                    is += 1;
                }
            }
        }
    } else {
        let step = (ratio.ceil() as usize).next_power_of_two();
        while is < strings.len() && ib < bytes.len() {
            let target = strings[is] + m;
            if bytes[ib] == target {
                sb.push(strings[is]);
                is += 1;
            } else if bytes[ib] < target {
                ib = gallop_to(bytes, ib, target, step);
            } else {
                let back = bytes[ib] - m;
                while is < strings.len() && strings[is] < back {
                    is += 1;
                }
            }
        }
    }
    sb
}

/// First position at or after `i` whose value is >= `target`: jump by
/// `step` while still below, then finish linearly.
fn gallop_to(list: &[Offset], mut i: usize, target: Offset, step: usize) -> usize {
    while i + step < list.len() && list[i + step] < target {
        i += step;
    }
    while i < list.len() && list[i] < target {
        i += 1;
    }
    i
}

/// Greatest number of non-overlapping occurrences of a length-`m` term
/// with the given sorted offsets. Greedy earliest-first selection: count
/// an offset, then the next offset at least `m` past it, and so on.
pub fn non_overlapping_count(offsets: &[Offset], m: Offset) -> usize {
    let mut iter = offsets.iter();
    let Some(&first) = iter.next() else {
        return 0;
    };
    let mut last = first;
    let mut count = 1;
    for &o in iter {
        if o >= last + m {
            count += 1;
            last = o;
        }
    }
    count
}

/// Postings for s+b, or None if in some document the extension falls below
/// that document's required count.
///
/// Only the non-overlapping count decides survival here. The full offset
/// list is kept for surviving terms: an occurrence of s that overlaps
/// another can still be the prefix of a valid longer match, e.g. with two
/// repeats required in "aabcabcaa" the overlapping "aa" at offsets 0 and 7
/// must stay so that length 3 can still reach "abc" and "bca".
fn extend_term(
    docs: &[DocRecord],
    s_postings: &Postings,
    b_postings: &Postings,
    m: usize,
) -> Option<Postings> {
    let mut sb = Postings::default();
    for (doc, record) in docs.iter().enumerate() {
        let doc = doc as u32;
        let strings = s_postings.offsets.get(&doc)?;
        let bytes = b_postings.offsets.get(&doc)?;

        let offsets = extend_offsets(strings, m as Offset, bytes);
        if non_overlapping_count(&offsets, (m + 1) as Offset) < record.required as usize {
            return None;
        }
        sb.add_offsets(doc, offsets);
    }
    Some(sb)
}

/// Terms whose occurrence count equals the required count in every
/// document.
fn exact_matches(
    docs: &[DocRecord],
    current: &BTreeMap<Term, Postings>,
    nonoverlapping: bool,
) -> Vec<Term> {
    current
        .iter()
        .filter(|(term, postings)| {
            postings.offsets.iter().all(|(&doc, list)| {
                let count = if nonoverlapping {
                    non_overlapping_count(list, term.len() as Offset)
                } else {
                    list.len()
                };
                count == docs[doc as usize].required as usize
            })
        })
        .map(|(term, _)| term.clone())
        .collect()
}

/// Find the longest substrings repeated at least the required number of
/// times in every document, growing terms one byte per pass from the
/// index's single-byte seed.
///
/// Each pass replaces the length-m term map with the length-m+1 map
/// derived from it. Total offset volume never grows: every s+b offset
/// list is a subsequence of s's list, and s is dropped as soon as its
/// extensions are emitted.
pub fn find_repeats(index: &InvertedIndex, config: &SearchConfig) -> RepeatsResults {
    let mut current = index.terms.clone();
    tracing::debug!(
        bytes = index.terms.len(),
        max_len = config.max_len,
        "starting repeat search"
    );

    let mut longest: Vec<Term> = Vec::new();
    let mut exact: Vec<Term> = Vec::new();
    let mut converged = false;

    let mut m = 1usize;
    loop {
        let em = exact_matches(&index.docs, &current, config.exact_nonoverlapping);
        if !em.is_empty() {
            exact = em;
        }
        if !current.is_empty() {
            longest = current.keys().cloned().collect();
        }
        if m >= config.max_len {
            break;
        }

        // A length-m+1 occurrence of s+b is a length-m occurrence of
        // s[1..]+b shifted by one, so only extensions whose shifted suffix
        // survived this pass can survive the next.
        let survivors: Vec<Term> = current.keys().cloned().collect();
        let mut candidates: BTreeMap<Term, Vec<u8>> = BTreeMap::new();
        let mut pairs = 0usize;
        for s in &survivors {
            let mut suffix = s[1..].to_vec();
            suffix.push(0);
            let mut extensions = Vec::new();
            for byte_term in index.terms.keys() {
                let b = byte_term[0];
                *suffix.last_mut().expect("suffix non-empty") = b;
                if survivors.binary_search(&suffix).is_ok() {
                    extensions.push(b);
                }
            }
            if !extensions.is_empty() {
                pairs += extensions.len();
                candidates.insert(s.clone(), extensions);
            }
        }
        current.retain(|s, _| candidates.contains_key(s));

        let mut next: BTreeMap<Term, Postings> = BTreeMap::new();
        for (s, extensions) in candidates {
            let s_postings = current.remove(&s).expect("candidate came from current");
            for b in extensions {
                let b_postings = &index.terms[[b].as_slice()];
                if let Some(postings) = extend_term(&index.docs, &s_postings, b_postings, m) {
                    let mut sb = s.clone();
                    sb.push(b);
                    next.insert(sb, postings);
                }
            }
        }

        tracing::debug!(
            len = m,
            survivors = survivors.len(),
            candidate_pairs = pairs,
            extended = next.len(),
            offsets = next.values().map(|p| p.total).sum::<usize>(),
            "extension pass"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            for term in next.keys() {
                tracing::trace!(len = m + 1, term = %term.escape_ascii(), "survivor");
            }
        }

        if next.is_empty() {
            converged = true;
            break;
        }
        current = next;
        m += 1;
    }

    tracing::info!(
        converged,
        longest = longest.len(),
        longest_len = longest.first().map_or(0, |t| t.len()),
        exact = exact.len(),
        "repeat search finished"
    );
    RepeatsResults {
        converged,
        longest,
        exact,
    }
}
