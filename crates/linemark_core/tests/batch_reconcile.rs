use linemark_core::{resolve_all, AnchorResolution, Annotation, EngineConfig, FileEngine};
use std::collections::BTreeSet;

const SHARED: &str = "process_batch(items);";

fn filler(count: usize) -> Vec<String> {
    (0..count)
        .map(|idx| format!("filler_{idx} = seed_{idx} + offset;"))
        .collect()
}

fn at(line: usize, text: &str, created_at: i64) -> Annotation {
    Annotation::new("src/jobs.rs", line, text, "note", created_at)
}

#[test]
fn older_stable_anchor_keeps_contested_line() {
    let mut lines = filler(30);
    lines[10] = SHARED.to_string();
    let older = at(10, SHARED, 1);
    let newer = at(10, SHARED, 2);

    // List order must not matter.
    let resolutions = resolve_all(&[newer.clone(), older.clone()], &lines);
    assert_eq!(resolutions[&older.id], AnchorResolution::Matched(10));
    assert_eq!(resolutions[&newer.id], AnchorResolution::Unresolved);
}

#[test]
fn loser_takes_alternate_exact_match_inside_its_window() {
    let mut lines = filler(30);
    lines[10] = SHARED.to_string();
    lines[12] = SHARED.to_string();
    let older = at(10, SHARED, 1);
    let newer = at(10, SHARED, 2);

    let resolutions = resolve_all(&[older.clone(), newer.clone()], &lines);
    assert_eq!(resolutions[&older.id], AnchorResolution::Matched(10));
    assert_eq!(resolutions[&newer.id], AnchorResolution::Matched(12));
}

#[test]
fn currently_valid_anchor_outranks_older_displaced_one() {
    let mut lines = filler(30);
    lines[5] = SHARED.to_string();
    let displaced_older = at(4, SHARED, 1);
    let stable_newer = at(5, SHARED, 2);

    let resolutions = resolve_all(&[displaced_older.clone(), stable_newer.clone()], &lines);
    assert_eq!(resolutions[&stable_newer.id], AnchorResolution::Matched(5));
    assert_eq!(resolutions[&displaced_older.id], AnchorResolution::Unresolved);
}

#[test]
fn no_two_annotations_share_a_line() {
    let mut lines = filler(40);
    for line in [3, 9, 15, 16, 22] {
        lines[line] = SHARED.to_string();
    }
    let annotations = (0..12)
        .map(|idx| at(idx * 3, SHARED, (12 - idx) as i64))
        .collect::<Vec<_>>();

    let resolutions = resolve_all(&annotations, &lines);
    let matched = resolutions
        .values()
        .filter_map(|resolution| resolution.line())
        .collect::<Vec<_>>();
    let unique = matched.iter().copied().collect::<BTreeSet<_>>();
    assert_eq!(matched.len(), unique.len());
    assert!(!matched.is_empty());
    for line in matched {
        assert_eq!(lines[line], SHARED);
    }
}

#[test]
fn resolution_is_idempotent_and_order_independent() {
    let mut lines = filler(25);
    lines[7] = SHARED.to_string();
    lines[9] = SHARED.to_string();
    let annotations = vec![at(8, SHARED, 5), at(8, SHARED, 5), at(7, SHARED, 9)];

    let first = resolve_all(&annotations, &lines);
    let second = resolve_all(&annotations, &lines);
    assert_eq!(first, second);

    let mut reversed = annotations.clone();
    reversed.reverse();
    assert_eq!(resolve_all(&reversed, &lines), first);
}

#[test]
fn reconcile_twice_changes_nothing_the_second_time() {
    let mut lines = filler(20);
    lines[6] = SHARED.to_string();
    let mut engine = FileEngine::new(
        "src/jobs.rs",
        vec![at(4, SHARED, 1)],
        &EngineConfig::default(),
    );

    let first = engine.reconcile(Some(lines.as_slice()));
    assert!(first.changed);
    assert_eq!(engine.annotations()[0].stored_line, 6);

    let second = engine.reconcile(Some(lines.as_slice()));
    assert!(!second.changed);
    assert!(second.events.is_empty());
}

#[test]
fn unavailable_text_reports_everything_unresolved() {
    let lines = filler(10);
    let engine = FileEngine::new(
        "src/jobs.rs",
        vec![at(2, &lines[2], 1), at(3, &lines[3], 2)],
        &EngineConfig::default(),
    );

    let rows = engine.resolve_all(None);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| !row.matched && row.line.is_none()));

    let rows = engine.resolve_all(Some(lines.as_slice()));
    assert_eq!(rows[0].line, Some(2));
    assert_eq!(rows[1].line, Some(3));
}
