// Unit tests for the cut timeline

use super::*;

fn validation(result: SplitterResult<impl std::fmt::Debug>) -> bool {
    matches!(result, Err(SplitterError::Validation { .. }))
}

#[test]
fn test_add_keeps_points_sorted_with_keep_tag() {
    let mut timeline = CutTimeline::new();
    timeline.add(10.0, 20.0).unwrap();
    timeline.add(5.0, 20.0).unwrap();
    let position = timeline.add(7.5, 20.0).unwrap();

    assert_eq!(position, 1);
    assert_eq!(timeline.timestamps(), vec![5.0, 7.5, 10.0]);
    assert!(timeline.points().iter().all(|p| p.tag == Tag::Keep));
}

#[test]
fn test_add_rejects_out_of_range() {
    let mut timeline = CutTimeline::new();
    assert!(validation(timeline.add(0.0, 20.0)));
    assert!(validation(timeline.add(20.0, 20.0)));
    assert!(validation(timeline.add(-1.0, 20.0)));
    assert!(validation(timeline.add(f64::NAN, 20.0)));
    assert!(validation(timeline.add(5.0, 0.0)));
    assert!(timeline.is_empty());
}

#[test]
fn test_add_rejects_position_within_epsilon_of_existing() {
    let mut timeline = CutTimeline::new();
    timeline.add(5.0, 20.0).unwrap();

    assert!(validation(timeline.add(5.0, 20.0)));
    assert!(validation(timeline.add(5.0004, 20.0)));
    assert!(validation(timeline.add(4.9996, 20.0)));
    assert_eq!(timeline.len(), 1);

    // One millisecond apart is allowed
    timeline.add(5.001, 20.0).unwrap();
    assert_eq!(timeline.len(), 2);
}

#[test]
fn test_add_rejects_position_that_rounds_onto_the_end() {
    let mut timeline = CutTimeline::new();
    assert!(validation(timeline.add(19.9997, 20.0)));
    assert!(validation(timeline.add(0.0003, 20.0)));
}

#[test]
fn test_remove_out_of_range_leaves_timeline_unchanged() {
    let mut timeline = CutTimeline::new();
    timeline.add(5.0, 20.0).unwrap();
    timeline.add(10.0, 20.0).unwrap();

    assert!(validation(timeline.remove(2)));
    assert_eq!(timeline.timestamps(), vec![5.0, 10.0]);

    let removed = timeline.remove(0).unwrap();
    assert_eq!(removed.seconds(), 5.0);
    assert_eq!(timeline.timestamps(), vec![10.0]);
}

#[test]
fn test_toggle_without_position_uses_most_recently_added() {
    let mut timeline = CutTimeline::new();
    timeline.add(10.0, 20.0).unwrap();
    timeline.add(5.0, 20.0).unwrap();

    // 5.0 was added last even though 10.0 sorts later
    assert_eq!(timeline.toggle_tag(None).unwrap(), Tag::Discard);
    assert_eq!(timeline.points()[0].tag, Tag::Discard);
    assert_eq!(timeline.points()[1].tag, Tag::Keep);

    assert_eq!(timeline.toggle_tag(None).unwrap(), Tag::Keep);
}

#[test]
fn test_toggle_with_position() {
    let mut timeline = CutTimeline::new();
    timeline.add(5.0, 20.0).unwrap();
    timeline.add(10.0, 20.0).unwrap();

    assert_eq!(timeline.toggle_tag(Some(10.0)).unwrap(), Tag::Discard);
    assert_eq!(timeline.points()[1].tag, Tag::Discard);
    assert!(validation(timeline.toggle_tag(Some(12.0))));
}

#[test]
fn test_toggle_matches_within_a_millisecond() {
    let mut timeline = CutTimeline::new();
    timeline.add(5.0, 20.0).unwrap();
    timeline.add(5.002, 20.0).unwrap();

    assert_eq!(timeline.find(5.0006), Some(0));
    assert_eq!(timeline.find(4.9991), Some(0));
    assert_eq!(timeline.find(5.0016), Some(1));
    assert_eq!(timeline.find(4.998), None);
    assert_eq!(timeline.find(f64::NAN), None);

    assert_eq!(timeline.toggle_tag(Some(5.0006)).unwrap(), Tag::Discard);
    assert_eq!(timeline.points()[0].tag, Tag::Discard);
    assert_eq!(timeline.points()[1].tag, Tag::Keep);
}

#[test]
fn test_toggle_on_empty_timeline_fails() {
    let mut timeline = CutTimeline::new();
    assert!(validation(timeline.toggle_tag(None)));
}

#[test]
fn test_set_tag() {
    let mut timeline = CutTimeline::new();
    timeline.add(5.0, 20.0).unwrap();
    timeline.set_tag(0, Tag::Discard).unwrap();
    assert_eq!(timeline.points()[0].tag, Tag::Discard);
    assert!(validation(timeline.set_tag(3, Tag::Keep)));
}

#[test]
fn test_cut_first_and_last() {
    let mut first = CutTimeline::new();
    first.cut_first(3.0, 20.0).unwrap();
    assert_eq!(first.timestamps(), vec![3.0]);

    let mut last = CutTimeline::new();
    last.cut_last(3.0, 20.0).unwrap();
    assert_eq!(last.timestamps(), vec![17.0]);
}

#[test]
fn test_cut_first_and_last_reject_seconds_beyond_duration() {
    let mut timeline = CutTimeline::new();
    assert!(validation(timeline.cut_first(20.0, 20.0)));
    assert!(validation(timeline.cut_last(25.0, 20.0)));
    assert!(validation(timeline.cut_first(0.0, 20.0)));
    assert!(timeline.is_empty());
}

#[test]
fn test_split_by_interval_replaces_timeline() {
    let mut timeline = CutTimeline::new();
    timeline.add(3.0, 25.0).unwrap();
    timeline.toggle_tag(None).unwrap();

    let count = timeline.split_by_interval(10.0, 25.0).unwrap();

    assert_eq!(count, 2);
    assert_eq!(timeline.timestamps(), vec![10.0, 20.0]);
    assert!(timeline.points().iter().all(|p| p.tag == Tag::Keep));
}

#[test]
fn test_split_by_interval_excludes_exact_end() {
    let mut timeline = CutTimeline::new();
    timeline.split_by_interval(10.0, 30.0).unwrap();
    assert_eq!(timeline.timestamps(), vec![10.0, 20.0]);
}

#[test]
fn test_split_by_interval_does_not_drift() {
    let mut timeline = CutTimeline::new();
    timeline.split_by_interval(0.1, 100.0).unwrap();
    assert_eq!(timeline.len(), 999);
    assert_eq!(timeline.points()[998].millis(), 99_900);
}

#[test]
fn test_split_by_interval_rejects_bad_interval() {
    let mut timeline = CutTimeline::new();
    timeline.add(5.0, 20.0).unwrap();

    assert!(validation(timeline.split_by_interval(0.0, 20.0)));
    assert!(validation(timeline.split_by_interval(-5.0, 20.0)));
    assert!(validation(timeline.split_by_interval(20.0, 20.0)));
    assert_eq!(timeline.timestamps(), vec![5.0]);
}

#[test]
fn test_split_by_interval_rejects_sub_millisecond_interval() {
    let mut timeline = CutTimeline::new();
    timeline.add(5.0, 100.0).unwrap();

    assert!(validation(timeline.split_by_interval(1e-9, 100.0)));
    assert!(validation(timeline.split_by_interval(0.0009, 100.0)));
    assert_eq!(timeline.timestamps(), vec![5.0]);

    let count = timeline.split_by_interval(MIN_SPLIT_INTERVAL, 0.0095).unwrap();
    assert_eq!(count, 9);
    let millis: Vec<i64> = timeline.points().iter().map(CutPoint::millis).collect();
    assert_eq!(millis, (1..=9).collect::<Vec<i64>>());
}

#[test]
fn test_from_points_sorts_and_drops_duplicates() {
    let (timeline, dropped) = CutTimeline::from_points(vec![
        CutPoint::new(10.0, Tag::Keep),
        CutPoint::new(5.0, Tag::Discard),
        CutPoint::new(10.0002, Tag::Discard),
    ]);

    assert_eq!(dropped, 1);
    assert_eq!(timeline.timestamps(), vec![5.0, 10.0]);
    assert_eq!(timeline.points()[1].tag, Tag::Keep);
    assert_eq!(timeline.most_recent_index(), Some(0));
}

#[test]
fn test_from_points_keeps_insertion_order_of_existing_timeline() {
    let mut original = CutTimeline::new();
    original.add(60.0, 90.0).unwrap();
    original.add(20.0, 90.0).unwrap();
    original.add(40.0, 90.0).unwrap();

    let (rebuilt, dropped) = CutTimeline::from_points(original.points().to_vec());
    assert_eq!(dropped, 0);
    assert_eq!(rebuilt.timestamps(), vec![20.0, 40.0, 60.0]);
    assert_eq!(rebuilt.most_recent_index(), Some(1));
}
