use repfind_core::{collect_documents, find_repeats, InvertedIndex, RepeatsResults, SearchConfig};
use std::fs;
use tempfile::TempDir;

fn write_corpus(files: &[(&str, &[u8])]) -> (TempDir, Vec<String>) {
    let dir = tempfile::tempdir().unwrap();
    let mut names = Vec::new();
    for (name, data) in files {
        let path = dir.path().join(name);
        fs::write(&path, data).unwrap();
        names.push(path.to_string_lossy().into_owned());
    }
    (dir, names)
}

fn search_with(files: &[(&str, &[u8])], config: &SearchConfig) -> RepeatsResults {
    let (_dir, names) = write_corpus(files);
    let specs = collect_documents(&names).unwrap();
    let index = InvertedIndex::build(specs).unwrap();
    find_repeats(&index, config)
}

fn search(files: &[(&str, &[u8])]) -> RepeatsResults {
    search_with(files, &SearchConfig::default())
}

fn terms(strings: &[&str]) -> Vec<Vec<u8>> {
    strings.iter().map(|s| s.as_bytes().to_vec()).collect()
}

#[test]
fn finds_doubled_substring() {
    let results = search(&[("a.repeats=2.txt", b"abcabc")]);
    assert!(results.converged);
    assert_eq!(results.longest, terms(&["abc"]));
    assert_eq!(results.exact, terms(&["abc"]));
}

#[test]
fn overlapping_short_matches_feed_longer_ones() {
    // The two "aa" occurrences overlap other matches but must be kept at
    // length 2, otherwise neither length-3 repeat is reachable.
    let results = search(&[("a.repeats=2.txt", b"aabcabcaa")]);
    assert!(results.converged);
    assert_eq!(results.longest, terms(&["abc", "bca"]));
    assert_eq!(results.exact, terms(&["abc", "bca"]));
}

#[test]
fn run_of_one_byte_is_capped_by_non_overlap_rule() {
    // "aa" starts at three positions in "aaaa" but only two disjoint
    // copies fit, so requiring three repeats stops growth at length 1.
    let results = search(&[("a.repeats=3.txt", b"aaaa")]);
    assert!(results.converged);
    assert_eq!(results.longest, terms(&["a"]));
    assert!(results.exact.is_empty());
}

#[test]
fn no_byte_reaches_threshold_in_any_document() {
    let results = search(&[
        ("a.repeats=2.txt", b"xy"),
        ("b.repeats=2.txt", b"xy"),
    ]);
    assert!(results.converged);
    assert!(results.longest.is_empty());
    assert!(results.exact.is_empty());
}

#[test]
fn overlapping_occurrences_do_not_extend() {
    // "issi" occurs at offsets 1 and 4, which collide for length 4, so the
    // search converges on the disjoint length-3 repeats.
    let results = search(&[("a.repeats=2.txt", b"mississippi")]);
    assert!(results.converged);
    assert_eq!(results.longest, terms(&["iss", "ssi"]));
    assert_eq!(results.exact, terms(&["iss", "ssi"]));
}

#[test]
fn finds_tripled_substring() {
    let results = search(&[("a.repeats=3.txt", b"abcabcabc")]);
    assert!(results.converged);
    assert_eq!(results.longest, terms(&["abc"]));
    assert_eq!(results.exact, terms(&["abc"]));
}

#[test]
fn identical_documents_behave_like_one() {
    let single = search(&[("a.repeats=2.txt", b"abcabc")]);
    let pair = search(&[
        ("a.repeats=2.txt", b"abcabc"),
        ("b.repeats=2.txt", b"abcabc"),
    ]);
    assert_eq!(pair, single);
}

#[test]
fn result_is_independent_of_manifest_order() {
    // Equal sizes and counts keep the ingestion sort stable, so reversing
    // the manifest really does reverse the processing order.
    let files = [
        ("a.repeats=2.txt", b"abcabcxx".as_slice()),
        ("b.repeats=2.txt", b"xxabcabc".as_slice()),
    ];
    let reversed = [files[1], files[0]];
    let forward = search(&files);
    assert_eq!(forward.longest, terms(&["abc"]));
    assert_eq!(forward, search(&reversed));
}

#[test]
fn length_cap_truncates_growth() {
    let capped = SearchConfig {
        max_len: 2,
        ..SearchConfig::default()
    };
    let results = search_with(&[("a.repeats=3.txt", b"abcabcabc")], &capped);
    assert!(!results.converged);
    assert_eq!(results.longest, terms(&["ab", "bc"]));
    assert_eq!(results.exact, terms(&["ab", "bc"]));
}

#[test]
fn zero_length_cap_reports_the_seed_alphabet() {
    let degenerate = SearchConfig {
        max_len: 0,
        ..SearchConfig::default()
    };
    let results = search_with(&[("a.repeats=2.txt", b"abcabc")], &degenerate);
    assert!(!results.converged);
    assert_eq!(results.longest, terms(&["a", "b", "c"]));
    assert_eq!(results.exact, terms(&["a", "b", "c"]));
}

#[test]
fn generous_length_cap_changes_nothing() {
    let roomy = SearchConfig {
        max_len: 50,
        ..SearchConfig::default()
    };
    assert_eq!(
        search_with(&[("a.repeats=3.txt", b"abcabcabc")], &roomy),
        search(&[("a.repeats=3.txt", b"abcabcabc")]),
    );
}

#[test]
fn threshold_larger_than_document_yields_empty_result() {
    let results = search(&[("a.repeats=3.txt", b"ab")]);
    assert!(results.converged);
    assert!(results.longest.is_empty());
    assert!(results.exact.is_empty());
}

#[test]
fn single_document_once_repeated_is_the_whole_document() {
    let results = search(&[("a.repeats=1.txt", b"abcd")]);
    assert!(results.converged);
    assert_eq!(results.longest, terms(&["abcd"]));
    assert_eq!(results.exact, terms(&["abcd"]));
}

#[test]
fn exact_match_counting_mode_is_switchable() {
    // "aa" starts three times in "aaaa" but fits twice without overlap:
    // the raw count never equals 2, the non-overlapping count does.
    let files = [("a.repeats=2.txt", b"aaaa".as_slice())];

    let raw = search(&files);
    assert_eq!(raw.longest, terms(&["aa"]));
    assert!(raw.exact.is_empty());

    let corrected = SearchConfig {
        exact_nonoverlapping: true,
        ..SearchConfig::default()
    };
    let adjusted = search_with(&files, &corrected);
    assert_eq!(adjusted.longest, terms(&["aa"]));
    assert_eq!(adjusted.exact, terms(&["aa"]));
}

#[test]
fn missing_document_aborts_the_build() {
    let names = vec!["no-such-file.repeats=2.txt".to_string()];
    assert!(collect_documents(&names).is_err());
}

#[test]
fn unparseable_names_are_skipped_not_fatal() {
    let (_dir, mut names) = write_corpus(&[("a.repeats=2.txt", b"abcabc")]);
    names.push("not-a-corpus-file.txt".to_string());
    let specs = collect_documents(&names).unwrap();
    assert_eq!(specs.len(), 1);
}
