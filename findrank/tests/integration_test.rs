use anyhow::Result;
use findrank::fuzzy::MatchField;
use findrank::search::document_lines;
use findrank::{
    apply_edits, compile, flatten, rank, search, search_documents, CandidateEntry, FileNode,
    FuzzyMatcher, Navigator, NavigatorState, SearchError, SearchOptions, MAX_RESULTS,
};

fn candidates(paths: &[&str]) -> Vec<CandidateEntry> {
    flatten(&FileNode::from_paths(paths))
}

fn ranked_paths(entries: &[CandidateEntry], query: &str, recent: &[&str]) -> Vec<String> {
    rank(entries, query, recent)
        .into_iter()
        .map(|c| c.entry.path)
        .collect()
}

#[test]
fn test_quick_open_fuzzy_ranking() {
    let entries = candidates(&["quickOpen.ts", "queryOptions.ts", "setup.ts"]);
    let ranked = ranked_paths(&entries, "qopn", &[]);
    assert_eq!(ranked, vec!["quickOpen.ts", "queryOptions.ts"]);
}

#[test]
fn test_empty_query_lists_recent_first() {
    let entries = candidates(&["a.ts", "b.ts", "c.ts"]);
    assert_eq!(ranked_paths(&entries, "", &["b.ts"]), vec!["b.ts", "a.ts", "c.ts"]);
    assert_eq!(ranked_paths(&entries, "   ", &["b.ts"]), vec!["b.ts", "a.ts", "c.ts"]);
}

#[test]
fn test_invalid_regex_attempts_no_matches() {
    let err = compile("(", &SearchOptions::new().regex(true)).unwrap_err();
    assert!(matches!(err, SearchError::InvalidPattern { ref pattern, .. } if pattern == "("));
    assert!(err.is_user_input());
}

#[test]
fn test_whole_word_literal_search() -> Result<()> {
    let pattern = compile("foo", &SearchOptions::new().whole_word(true))?;
    let result = search(&pattern, document_lines("a.txt", "foobar foo baz"));
    assert_eq!(result.total_matches(), 1);
    let m = &result.matches()[0];
    assert_eq!((m.match_start, m.match_end, m.column), (7, 10, 8));
    Ok(())
}

#[test]
fn test_include_exclude_globs() -> Result<()> {
    let options = SearchOptions::new().include("*.ts").exclude("*.test.ts");
    let pattern = compile("x", &options)?;
    let result = search_documents(&pattern, [("a.ts", "x"), ("a.test.ts", "x"), ("a.js", "x")]);

    let files: Vec<&str> = result.groups().iter().map(|g| g.file.as_str()).collect();
    assert_eq!(files, vec!["a.ts"]);
    assert_eq!(result.files_searched, 1);
    assert_eq!(result.files_skipped, 2);
    Ok(())
}

#[test]
fn test_exact_match_beats_every_other_match() {
    let matcher = FuzzyMatcher::default();
    let query = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    let exact = matcher.score(query, &query.to_uppercase());
    assert!(exact.matched);

    let longer = format!("b{}", query);
    let spread: String = query.chars().flat_map(|c| [c, '_']).collect();
    for other in [longer.as_str(), spread.as_str()] {
        let score = matcher.score(query, other);
        assert!(score.matched, "{other} should match");
        assert!(exact.score > score.score, "{other} scored {}", score.score);
    }
}

#[test]
fn test_missing_or_out_of_order_characters_never_match() {
    let matcher = FuzzyMatcher::default();
    for (query, candidate) in [("ba", "ab"), ("abcz", "abc"), ("tsx", "index.ts"), ("ee", "e")] {
        assert!(!matcher.score(query, candidate).matched, "{query} vs {candidate}");
        assert_eq!(matcher.score(query, candidate).score, 0);
    }
}

#[test]
fn test_ranking_depends_on_score_not_input_order() {
    let paths = ["src/main.rs", "src/mailbox.rs", "docs/manual.md", "main.rs"];
    let forward = candidates(&paths);
    let mut backward = forward.clone();
    backward.reverse();

    let rank_forward = rank(&forward, "man", &[] as &[&str]);
    let rank_backward = rank(&backward, "man", &[] as &[&str]);

    // Compare only candidates whose scores differ.
    for a in &rank_forward {
        for b in &rank_forward {
            if a.score.score > b.score.score {
                let pos = |path: &str| rank_backward.iter().position(|c| c.path() == path);
                assert!(pos(a.path()) < pos(b.path()), "{} vs {}", a.path(), b.path());
            }
        }
    }
    assert_eq!(rank_forward.len(), 3);
    assert_eq!(rank_forward[0].path(), "docs/manual.md");
    assert_eq!(rank_backward[0].path(), "docs/manual.md");
    assert_eq!(rank_forward[0].field, MatchField::Name);
}

#[test]
fn test_ranked_output_is_capped() {
    let paths: Vec<String> = (0..500).map(|i| format!("dir{}/file{}.rs", i % 7, i)).collect();
    let entries = flatten(&FileNode::from_paths(&paths));
    assert_eq!(entries.len(), 500);

    assert_eq!(rank(&entries, "file", &[] as &[&str]).len(), MAX_RESULTS);
    assert_eq!(rank(&entries, "", &[] as &[&str]).len(), MAX_RESULTS);
    let recent: Vec<&str> = paths.iter().map(String::as_str).collect();
    assert_eq!(rank(&entries, "", &recent).len(), MAX_RESULTS);
}

#[test]
fn test_replace_all_then_search_again_finds_nothing() -> Result<()> {
    let docs = [
        ("src/a.rs", "let old = 1;\nprintln!(\"{}\", old);\n"),
        ("src/b.rs", "// OLD comment\nfn old_name() {}\n"),
        ("README.md", "nothing here\n"),
    ];
    let pattern = compile("old", &SearchOptions::new())?;
    let mut navigator = Navigator::with_results(search_documents(&pattern, docs));
    assert_eq!(navigator.results().total_matches(), 4);

    let intent = navigator.replace_all("fresh")?;
    let updated: Vec<(String, String)> = docs
        .iter()
        .map(|(file, text)| Ok((file.to_string(), apply_edits(file, text, intent.edits())?)))
        .collect::<Result<_>>()?;

    assert_eq!(updated[1].1, "// fresh comment\nfn fresh_name() {}\n");
    let again = search_documents(
        &pattern,
        updated.iter().map(|(f, t)| (f.as_str(), t.as_str())),
    );
    assert!(again.is_empty());

    // Original results were not touched by the replace.
    assert_eq!(navigator.results().total_matches(), 4);
    assert!(matches!(
        navigator.replace_all("again"),
        Err(SearchError::StaleResults)
    ));
    navigator.set_results(again);
    assert_eq!(navigator.state(), NavigatorState::Empty);
    Ok(())
}

#[test]
fn test_navigation_wraps() -> Result<()> {
    let pattern = compile("x", &SearchOptions::new())?;
    let mut navigator = Navigator::with_results(search_documents(&pattern, [("a", "x\nx\nx")]));

    assert_eq!(navigator.previous().map(|m| m.line), Some(3));
    assert_eq!(navigator.next().map(|m| m.line), Some(1));

    let mut empty = Navigator::new();
    assert!(empty.next().is_none());
    assert!(empty.previous().is_none());
    assert_eq!(empty.state(), NavigatorState::Empty);
    Ok(())
}
