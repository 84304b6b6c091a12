use linemark_core::{resolve, resolve_excluding, AnchorResolution, Annotation};
use std::collections::BTreeSet;

fn doc(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

fn numbered_doc(count: usize) -> Vec<String> {
    (0..count)
        .map(|idx| format!("let value_{idx} = compute_{idx}(input);"))
        .collect()
}

fn anchored(lines: &[String], line: usize) -> Annotation {
    Annotation::new("src/lib.rs", line, &lines[line], "note", 1)
}

#[test]
fn insertion_above_shifts_anchor_down() {
    let original = doc(&[
        "// config loader",
        "import fs from 'fs';",
        "",
        "const defaults = {};",
        "function loadConfig() {",
        "  return fs.readFileSync(path);",
        "}",
    ]);
    let annotation = anchored(&original, 4);

    let mut edited = doc(&["// inserted one", "// inserted two"]);
    edited.extend(original.iter().cloned());

    assert_eq!(resolve(&annotation, &edited), AnchorResolution::Matched(6));
}

#[test]
fn pure_insertion_and_deletion_within_radius() {
    let original = numbered_doc(20);
    let annotation = anchored(&original, 8);

    let mut inserted = doc(&["// a", "// b", "// c"]);
    inserted.extend(original.iter().cloned());
    assert_eq!(resolve(&annotation, &inserted), AnchorResolution::Matched(11));

    let deleted = original[2..].to_vec();
    assert_eq!(resolve(&annotation, &deleted), AnchorResolution::Matched(6));
}

#[test]
fn shift_beyond_radius_is_unresolved_not_scanned() {
    let original = numbered_doc(20);
    let annotation = anchored(&original, 8);

    let mut inserted = (0..5).map(|idx| format!("// pad {idx}")).collect::<Vec<_>>();
    inserted.extend(original.iter().cloned());

    assert_eq!(resolve(&annotation, &inserted), AnchorResolution::Unresolved);
}

#[test]
fn generic_snapshots_never_resolve_even_at_stored_line() {
    let lines = doc(&["}", "else", ";", "fn real_work() {"]);
    for line in 0..3 {
        let annotation = anchored(&lines, line);
        assert_eq!(
            resolve(&annotation, &lines),
            AnchorResolution::Unresolved,
            "line {line} should be gated"
        );
    }
    assert_eq!(
        resolve(&anchored(&lines, 3), &lines),
        AnchorResolution::Matched(3)
    );
}

#[test]
fn semicolon_snapshot_is_unresolved_for_any_document() {
    let mut annotation = Annotation::new("src/lib.rs", 0, ";", "note", 1);
    for lines in [doc(&[";"]), doc(&[";", ";", ";"]), Vec::new()] {
        assert_eq!(resolve(&annotation, &lines), AnchorResolution::Unresolved);
    }
    annotation.stored_line = 2;
    assert_eq!(
        resolve(&annotation, &doc(&["a", "b", ";"])),
        AnchorResolution::Unresolved
    );
}

#[test]
fn missing_snapshot_never_matches_by_line_number() {
    let lines = doc(&["fn keep_me() {}"]);
    let mut annotation = anchored(&lines, 0);
    annotation.content_snapshot = None;
    assert_eq!(resolve(&annotation, &lines), AnchorResolution::Unresolved);

    annotation.content_snapshot = Some("   ".to_string());
    assert_eq!(resolve(&annotation, &lines), AnchorResolution::Unresolved);
}

#[test]
fn match_is_trimmed_and_case_sensitive() {
    let annotation = Annotation::new("src/lib.rs", 1, "foo_bar();", "note", 1);
    assert_eq!(
        resolve(&annotation, &doc(&["", "      foo_bar();   "])),
        AnchorResolution::Matched(1)
    );
    assert_eq!(
        resolve(&annotation, &doc(&["", "Foo_Bar();"])),
        AnchorResolution::Unresolved
    );
}

#[test]
fn stored_line_wins_over_neighbors_and_lower_side_wins_ties() {
    let duplicated = doc(&["x_call();", "x_call();"]);
    let annotation = Annotation::new("src/lib.rs", 1, "x_call();", "note", 1);
    assert_eq!(resolve(&annotation, &duplicated), AnchorResolution::Matched(1));

    let lines = doc(&[
        "alpha_one();",
        "alpha_two();",
        "log_event(ctx);",
        "alpha_three();",
        "alpha_four();",
        "alpha_five();",
        "log_event(ctx);",
        "alpha_six();",
    ]);
    let annotation = Annotation::new("src/lib.rs", 4, "log_event(ctx);", "note", 1);
    // Equal distance on both sides: the lower index is tried first.
    assert_eq!(resolve(&annotation, &lines), AnchorResolution::Matched(2));

    let claimed = BTreeSet::from([2]);
    assert_eq!(
        resolve_excluding(&annotation, &lines, &claimed),
        AnchorResolution::Matched(6)
    );

    let claimed = BTreeSet::from([2, 6]);
    assert_eq!(
        resolve_excluding(&annotation, &lines, &claimed),
        AnchorResolution::Unresolved
    );
}

#[test]
fn stored_line_past_end_still_searches_window() {
    let lines = doc(&["fn first() {}", "fn second() {}", "fn third() {}"]);
    let annotation = Annotation::new("src/lib.rs", 4, "fn third() {}", "note", 1);
    assert_eq!(resolve(&annotation, &lines), AnchorResolution::Matched(2));
}
