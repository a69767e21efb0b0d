//! End-to-end scenarios for the timeline engine
//!
//! Each test drives the public API the way a UI event handler would: take a
//! snapshot, plan a change, apply the batch, and check the lane invariants.

use slate_timeline::track::{lane_members, packing_lane};
use slate_timeline::{
    ScheduleEntry, ScheduleSettings, ScheduleSnapshot, StartTimeUpdate, TimelineError, Track,
    UpdateBatch, build_gapless_normalize_start_time_updates, build_gapless_reorder_updates,
    compute_day_start_shift, normalize_all_lanes, plan_cross_track_move, plan_move_within_track,
    plan_removal, plan_resize, MINUTES_PER_DAY,
};

fn tracks() -> Vec<Track> {
    vec![
        Track::lane("A", "Photo", 0).with_color("#2563eb"),
        Track::lane("B", "Video", 1).with_color("#16a34a"),
        Track::shared("all", "All crew", 2),
    ]
}

fn snapshot(entries: Vec<ScheduleEntry>) -> ScheduleSnapshot {
    ScheduleSnapshot::new(tracks(), entries, ScheduleSettings::default())
}

fn apply(snapshot: &ScheduleSnapshot, batch: &UpdateBatch) -> ScheduleSnapshot {
    let mut next = snapshot.clone();
    batch.apply_to(&mut next.entries);
    next
}

/// Every lane is gapless and inside the day
fn assert_packed(snapshot: &ScheduleSnapshot) {
    for track in snapshot.tracks.iter().filter(|t| t.is_lane()) {
        let members = lane_members(&snapshot.entries, &snapshot.tracks, &track.id);
        for pair in members.windows(2) {
            assert_eq!(
                pair[1].start_time,
                pair[0].end_time(),
                "lane {}: {} should follow {}",
                track.id,
                pair[1].id,
                pair[0].id
            );
        }
        for entry in members {
            assert!(entry.end_time() <= MINUTES_PER_DAY, "{} ends after midnight", entry.id);
        }
    }
}

#[test]
fn scenario_a_normalize_closes_gap() {
    let entries = vec![
        ScheduleEntry::new("1", "A", 540, 30),
        ScheduleEntry::new("2", "A", 600, 15),
    ];
    let updates = build_gapless_normalize_start_time_updates(&entries, &tracks(), "A").unwrap();
    assert_eq!(updates, vec![StartTimeUpdate::new("2", 570)]);
}

#[test]
fn scenario_b_reorder_from_anchor() {
    let entries = vec![
        ScheduleEntry::new("1", "A", 540, 30),
        ScheduleEntry::new("2", "A", 570, 15),
    ];
    let updates = build_gapless_reorder_updates(&entries, "A", &["2", "1"], 540).unwrap();
    assert_eq!(
        updates,
        vec![StartTimeUpdate::new("2", 540), StartTimeUpdate::new("1", 555)]
    );
}

#[test]
fn scenario_c_move_into_populated_lane() {
    let snap = snapshot(vec![
        ScheduleEntry::new("3", "A", 640, 60),
        ScheduleEntry::new("4", "B", 600, 30),
    ]);
    let batch = plan_cross_track_move(&snap, "3", "B").unwrap();

    let moved = batch.get("3").unwrap();
    assert_eq!(moved.track_id.as_deref(), Some("B"));
    assert_eq!(moved.start_time, Some(630));
    assert!(batch.get("4").is_none());
    assert_packed(&apply(&snap, &batch));
}

#[test]
fn scenario_d_day_start_shift_earlier() {
    let entries = vec![
        ScheduleEntry::new("1", "A", 360, 120),
        ScheduleEntry::new("2", "A", 480, 900),
        ScheduleEntry::new("3", "B", 1400, 30),
    ];
    let settings = ScheduleSettings::default();
    assert_eq!(settings.day_start_time, 360);

    let shift = compute_day_start_shift(&entries, &tracks(), &settings, 330).unwrap();
    assert_eq!(shift.delta, -30);
    assert_eq!(shift.updates.len(), 3);
    for entry in &entries {
        assert_eq!(
            shift.updates.get(&entry.id).unwrap().start_time,
            Some(entry.start_time - 30)
        );
    }
}

#[test]
fn scenario_e_day_start_shift_past_midnight() {
    let entries = vec![
        ScheduleEntry::new("1", "A", 360, 120),
        ScheduleEntry::new("2", "B", 1400, 30),
    ];
    let snapshot_before = entries.clone();
    let result = compute_day_start_shift(&entries, &tracks(), &ScheduleSettings::default(), 380);
    assert!(matches!(result, Err(TimelineError::OutOfDayRange { .. })));
    assert_eq!(entries, snapshot_before);
}

#[test]
fn day_start_shift_ignores_early_call_banner() {
    let entries = vec![
        ScheduleEntry::new("call", "all", 300, 30).applies_to(["A", "B"]),
        ScheduleEntry::new("1", "A", 360, 60),
        ScheduleEntry::new("2", "B", 360, 60),
    ];
    let shift =
        compute_day_start_shift(&entries, &tracks(), &ScheduleSettings::default(), 330).unwrap();
    assert_eq!(shift.delta, -30);
    assert_eq!(shift.updates.get("1").unwrap().start_time, Some(330));
    assert_eq!(shift.updates.get("call").unwrap().start_time, Some(270));
}

#[test]
fn repeated_edits_keep_lanes_packed() {
    let mut snap = snapshot(vec![
        ScheduleEntry::new("1", "A", 540, 30),
        ScheduleEntry::new("2", "A", 575, 15),
        ScheduleEntry::new("3", "A", 580, 45),
        ScheduleEntry::new("4", "B", 600, 60),
        ScheduleEntry::new("5", "B", 700, 20),
        ScheduleEntry::new("lunch", "all", 720, 60).applies_to(["B"]),
        ScheduleEntry::new("wrap", "all", 1000, 30).applies_to(["A", "B"]),
    ]);

    let outcome = normalize_all_lanes(&snap);
    assert!(outcome.skipped.is_empty());
    snap = apply(&snap, &outcome.batch);
    assert_packed(&snap);
    assert!(normalize_all_lanes(&snap).batch.is_empty(), "normalize is idempotent");

    let steps: Vec<Box<dyn Fn(&ScheduleSnapshot) -> UpdateBatch>> = vec![
        Box::new(|s: &ScheduleSnapshot| plan_move_within_track(s, "3", 0).unwrap()),
        Box::new(|s: &ScheduleSnapshot| plan_cross_track_move(s, "2", "B").unwrap()),
        Box::new(|s: &ScheduleSnapshot| plan_resize(s, "4", 90).unwrap()),
        Box::new(|s: &ScheduleSnapshot| plan_cross_track_move(s, "lunch", "A").unwrap()),
        Box::new(|s: &ScheduleSnapshot| plan_move_within_track(s, "5", 1).unwrap()),
    ];
    for step in steps {
        let batch = step(&snap);
        for update in batch.updates() {
            if let Some(start) = update.start_time {
                let before = snap.entry(&update.entry_id).unwrap();
                assert_ne!(before.start_time, start, "diff must be minimal");
            }
        }
        snap = apply(&snap, &batch);
        assert_packed(&snap);
    }

    // lunch now belongs to lane A and packs there
    let lunch = snap.entry("lunch").unwrap();
    assert_eq!(lunch.track_id, "A");
    assert_eq!(packing_lane(lunch, &snap.tracks), Some("A"));
    assert!(lane_members(&snap.entries, &snap.tracks, "A")
        .iter()
        .any(|e| e.id == "lunch"));
    assert!(!lane_members(&snap.entries, &snap.tracks, "B")
        .iter()
        .any(|e| e.id == "lunch"));

    // the multi-lane banner is never touched by lane packing
    assert_eq!(snap.entry("wrap").unwrap().start_time, 1000);

    let removal = plan_removal(&snap, "1").unwrap();
    let mut without = apply(&snap, &removal);
    without.entries.retain(|e| e.id != "1");
    assert_packed(&without);
}
