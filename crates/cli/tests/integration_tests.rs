//! End-to-end integration tests for the Slate CLI
//!
//! Commands run against isolated database instances, one per test.
//!
//! - `adding` - appending shots and banners
//! - `editing` - remove, resize, retime, reorder, move
//! - `whole_schedule` - normalize, day start, settings, show, check
//! - `error_cases` - refused changes leave the store untouched

mod common;

use common::*;
use slate_cli::commands::{
    CheckCommand, DayStartCommand, InitCommand, NormalizeCommand, SettingsCommand, ShowCommand,
    settings::Toggle,
};
use slate_db::DbError;
use slate_timeline::{
    EntryKind, IssueKind, ScheduleEntry, ScheduleSettings, TimeIncrement, TimelineError,
    ValidationSeverity,
};

fn shot(id: &str, track: &str, start: u32, duration: u32) -> ScheduleEntry {
    ScheduleEntry::new(id, track, start, duration).with_title(format!("Shot {id}"))
}

// =============================================================================
// ADDING
// =============================================================================

mod adding {
    use super::*;

    #[tokio::test]
    async fn test_first_entry_starts_at_day_start() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;

        let result = add_cmd("Hero", "photo", "45m").execute(&ctx.db).await.unwrap();
        assert_eq!(result.entry.start_time, 360);
        assert_eq!(result.entry.duration, 45);
        assert_eq!(ctx.entry(&result.entry.id).await.title, "Hero");
    }

    #[tokio::test]
    async fn test_entries_append_after_lane_end() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;

        let first = add_cmd("Hero", "photo", "45m").execute(&ctx.db).await.unwrap();
        let second = add_cmd("Detail", "photo", "1h 30m").execute(&ctx.db).await.unwrap();
        let other_lane = add_cmd("B-roll", "video", "20").execute(&ctx.db).await.unwrap();

        assert_eq!(second.entry.start_time, first.entry.end_time());
        assert_eq!(second.entry.duration, 90);
        assert_eq!(other_lane.entry.start_time, 360);
        assert_ne!(first.entry.id, second.entry.id);
    }

    #[tokio::test]
    async fn test_single_lane_banner_packs_in_that_lane() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;

        let banner = banner_cmd("Reset", "all", "15m", &["photo"])
            .execute(&ctx.db)
            .await
            .unwrap();
        assert_eq!(banner.entry.kind, EntryKind::Custom);
        assert_eq!(banner.entry.start_time, 510);
    }

    #[tokio::test]
    async fn test_multi_lane_banner_appends_on_owning_track() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 240)).await;

        let lunch = banner_cmd("Lunch", "all", "1h", &["photo", "video"])
            .execute(&ctx.db)
            .await
            .unwrap();
        // nothing on the shared track yet, so the day start
        assert_eq!(lunch.entry.start_time, 360);
        assert_eq!(
            ctx.entry(&lunch.entry.id).await.applies_to_track_ids,
            Some(vec!["photo".to_string(), "video".to_string()])
        );
    }

    #[tokio::test]
    async fn test_add_repairs_lane_on_load() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;
        ctx.seed(shot("b", "photo", 600, 30)).await;

        let result = add_cmd("Late", "photo", "30m").execute(&ctx.db).await.unwrap();
        assert_eq!(result.repaired, 1);
        assert_eq!(ctx.start_of("b").await, 510);
        assert_eq!(result.entry.start_time, 540);
    }

    #[tokio::test]
    async fn test_add_without_cascade_keeps_gaps() {
        let ctx = TestContext::with_tracks(no_cascade()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;
        ctx.seed(shot("b", "photo", 600, 30)).await;

        let result = add_cmd("Late", "photo", "30m").execute(&ctx.db).await.unwrap();
        assert_eq!(result.repaired, 0);
        assert_eq!(ctx.start_of("b").await, 600);
        assert_eq!(result.entry.start_time, 630);
    }
}

// =============================================================================
// EDITING
// =============================================================================

mod editing {
    use super::*;

    async fn three_in_photo(settings: ScheduleSettings) -> TestContext {
        let ctx = TestContext::with_tracks(settings).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;
        ctx.seed(shot("b", "photo", 510, 30)).await;
        ctx.seed(shot("c", "photo", 540, 30)).await;
        ctx
    }

    #[tokio::test]
    async fn test_remove_closes_gap() {
        let ctx = three_in_photo(ScheduleSettings::default()).await;

        let summary = remove_cmd("b", false).execute(&ctx.db).await.unwrap();
        assert!(summary.headline.starts_with("Removed b"));
        assert_eq!(summary.changes.len(), 1);
        assert_eq!(ctx.start_of("c").await, 510);
        assert!(ctx.db.entries().get("b").await.unwrap().is_none());
        // soft delete keeps the record
        assert!(ctx.db.entries().exists("b").await.unwrap());
    }

    #[tokio::test]
    async fn test_hard_remove_drops_record() {
        let ctx = three_in_photo(ScheduleSettings::default()).await;

        remove_cmd("a", true).execute(&ctx.db).await.unwrap();
        assert!(!ctx.db.entries().exists("a").await.unwrap());
        // lane keeps its earliest remaining start
        assert_eq!(ctx.start_of("b").await, 510);
        assert_eq!(ctx.start_of("c").await, 540);
    }

    #[tokio::test]
    async fn test_remove_without_cascade_leaves_gap() {
        let ctx = three_in_photo(no_cascade()).await;

        let summary = remove_cmd("b", false).execute(&ctx.db).await.unwrap();
        assert!(summary.changes.is_empty());
        assert_eq!(ctx.start_of("c").await, 540);
    }

    #[tokio::test]
    async fn test_resize_pushes_later_entries() {
        let ctx = three_in_photo(ScheduleSettings::default()).await;

        resize_cmd("a", "1h").execute(&ctx.db).await.unwrap();
        assert_eq!(ctx.entry("a").await.duration, 60);
        assert_eq!(ctx.start_of("a").await, 480);
        assert_eq!(ctx.start_of("b").await, 540);
        assert_eq!(ctx.start_of("c").await, 570);
    }

    #[tokio::test]
    async fn test_resize_shrink_pulls_later_entries() {
        let ctx = three_in_photo(ScheduleSettings::default()).await;

        resize_cmd("b", "10m").execute(&ctx.db).await.unwrap();
        assert_eq!(ctx.start_of("c").await, 520);
    }

    #[tokio::test]
    async fn test_resize_without_cascade_only_changes_duration() {
        let ctx = three_in_photo(no_cascade()).await;

        resize_cmd("a", "1h").execute(&ctx.db).await.unwrap();
        assert_eq!(ctx.entry("a").await.duration, 60);
        assert_eq!(ctx.start_of("b").await, 510);
    }

    #[tokio::test]
    async fn test_retime_resorts_lane() {
        let ctx = three_in_photo(ScheduleSettings::default()).await;

        retime_cmd("c", 450).execute(&ctx.db).await.unwrap();
        assert_eq!(ctx.start_of("c").await, 450);
        assert_eq!(ctx.start_of("a").await, 480);
        assert_eq!(ctx.start_of("b").await, 510);
    }

    #[tokio::test]
    async fn test_retime_without_cascade_moves_one_entry() {
        let ctx = three_in_photo(no_cascade()).await;

        retime_cmd("a", 700).execute(&ctx.db).await.unwrap();
        assert_eq!(ctx.start_of("a").await, 700);
        assert_eq!(ctx.start_of("b").await, 510);
    }

    #[tokio::test]
    async fn test_reorder_moves_entry_to_front() {
        let ctx = three_in_photo(ScheduleSettings::default()).await;

        let summary = reorder_cmd("c", 1).execute(&ctx.db).await.unwrap();
        assert_eq!(summary.changes.len(), 3);
        assert_eq!(ctx.start_of("c").await, 480);
        assert_eq!(ctx.start_of("a").await, 510);
        assert_eq!(ctx.start_of("b").await, 540);
    }

    #[tokio::test]
    async fn test_reorder_past_end_puts_entry_last() {
        let ctx = three_in_photo(ScheduleSettings::default()).await;

        reorder_cmd("a", 99).execute(&ctx.db).await.unwrap();
        assert_eq!(ctx.start_of("b").await, 480);
        assert_eq!(ctx.start_of("c").await, 510);
        assert_eq!(ctx.start_of("a").await, 540);
    }

    #[tokio::test]
    async fn test_move_packs_both_lanes() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;
        ctx.seed(shot("b", "photo", 510, 30)).await;
        ctx.seed(shot("v", "video", 600, 60)).await;

        move_cmd("b", "video").execute(&ctx.db).await.unwrap();

        let moved = ctx.entry("b").await;
        assert_eq!(moved.track_id, "video");
        assert_eq!(moved.start_time, 600);
        assert_eq!(ctx.start_of("v").await, 630);
        assert_eq!(ctx.start_of("a").await, 480);
    }

    #[tokio::test]
    async fn test_move_closes_source_gap() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;
        ctx.seed(shot("b", "photo", 510, 30)).await;
        ctx.seed(shot("c", "photo", 540, 30)).await;

        move_cmd("b", "video").execute(&ctx.db).await.unwrap();

        assert_eq!(ctx.start_of("c").await, 510);
        // empty destination anchors at the moved entry's own start
        assert_eq!(ctx.start_of("b").await, 510);
        assert_eq!(ctx.entry("b").await.track_id, "video");
    }

    #[tokio::test]
    async fn test_move_without_cascade_only_changes_track() {
        let ctx = TestContext::with_tracks(no_cascade()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;
        ctx.seed(shot("b", "photo", 510, 30)).await;
        ctx.seed(shot("v", "video", 600, 60)).await;

        move_cmd("b", "video").execute(&ctx.db).await.unwrap();

        assert_eq!(ctx.entry("b").await.track_id, "video");
        assert_eq!(ctx.start_of("b").await, 510);
        assert_eq!(ctx.start_of("v").await, 600);
    }

    #[tokio::test]
    async fn test_move_banner_onto_lane_packs_there() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;
        ctx.seed(shot("v", "video", 600, 30)).await;
        ctx.seed(
            ScheduleEntry::new("lunch", "all", 630, 60)
                .with_kind(EntryKind::Custom)
                .applies_to(["video"]),
        )
        .await;

        move_cmd("lunch", "photo").execute(&ctx.db).await.unwrap();

        let lunch = ctx.entry("lunch").await;
        assert_eq!(lunch.track_id, "photo");
        assert_eq!(lunch.applies_to_track_ids, Some(vec!["photo".to_string()]));
        assert_eq!(lunch.start_time, 510);
        assert_eq!(ctx.start_of("v").await, 600);
    }

    #[tokio::test]
    async fn test_move_to_same_track_is_noop() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;

        let summary = move_cmd("a", "photo").execute(&ctx.db).await.unwrap();
        assert_eq!(summary.headline, "a is already on photo");
        assert!(summary.changes.is_empty());
    }
}

// =============================================================================
// WHOLE SCHEDULE
// =============================================================================

mod whole_schedule {
    use super::*;

    #[tokio::test]
    async fn test_init_writes_settings() {
        let ctx = TestContext::new().await;

        let result = InitCommand {
            day_start: Some(450),
            increment: Some(TimeIncrement::Five),
            no_cascade: true,
        }
        .execute(&ctx.db)
        .await
        .unwrap();

        let expected = ScheduleSettings {
            day_start_time: 450,
            cascade_changes: false,
            time_increment: TimeIncrement::Five,
        };
        assert_eq!(result.settings, expected);
        assert_eq!(ctx.db.settings().get().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_normalize_repairs_every_lane() {
        let ctx = TestContext::with_tracks(no_cascade()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;
        ctx.seed(shot("b", "photo", 600, 30)).await;
        ctx.seed(shot("v1", "video", 420, 60)).await;
        ctx.seed(shot("v2", "video", 450, 30)).await;

        let result = NormalizeCommand {}.execute(&ctx.db).await.unwrap();
        assert_eq!(result.updated, 2);
        assert!(result.skipped.is_empty());
        assert_eq!(ctx.start_of("b").await, 510);
        assert_eq!(ctx.start_of("v2").await, 480);

        let again = NormalizeCommand {}.execute(&ctx.db).await.unwrap();
        assert_eq!(again.updated, 0);
        assert_eq!(again.to_string(), "All lanes already gapless");
    }

    #[tokio::test]
    async fn test_day_start_shifts_everything() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;
        ctx.seed(shot("b", "photo", 510, 30)).await;
        ctx.seed(
            ScheduleEntry::new("lunch", "all", 720, 60)
                .with_kind(EntryKind::Custom)
                .applies_to(["photo", "video"]),
        )
        .await;

        let summary = DayStartCommand { time: 420 }.execute(&ctx.db).await.unwrap();
        assert_eq!(summary.headline, "Day start set to 07:00 (entries moved 1h earlier)");

        assert_eq!(ctx.start_of("a").await, 420);
        assert_eq!(ctx.start_of("b").await, 450);
        assert_eq!(ctx.start_of("lunch").await, 660);
        assert_eq!(ctx.db.settings().get().await.unwrap().day_start_time, 420);
    }

    #[tokio::test]
    async fn test_day_start_measured_from_lane_work() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(
            ScheduleEntry::new("call", "all", 300, 30)
                .with_kind(EntryKind::Custom)
                .applies_to(["photo", "video"]),
        )
        .await;
        ctx.seed(shot("a", "photo", 360, 60)).await;

        DayStartCommand { time: 330 }.execute(&ctx.db).await.unwrap();

        assert_eq!(ctx.start_of("a").await, 330);
        assert_eq!(ctx.start_of("call").await, 270);
    }

    #[tokio::test]
    async fn test_day_start_on_empty_schedule_sets_anchor() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;

        DayStartCommand { time: 300 }.execute(&ctx.db).await.unwrap();
        let added = add_cmd("Dawn", "photo", "30m").execute(&ctx.db).await.unwrap();
        assert_eq!(added.entry.start_time, 300);
    }

    #[tokio::test]
    async fn test_settings_toggle_cascade() {
        let ctx = TestContext::new().await;

        let shown = SettingsCommand {
            cascade: None,
            increment: None,
        }
        .execute(&ctx.db)
        .await
        .unwrap();
        assert!(!shown.changed);
        assert!(shown.settings.cascade_changes);

        let updated = SettingsCommand {
            cascade: Some(Toggle::Off),
            increment: Some(TimeIncrement::Thirty),
        }
        .execute(&ctx.db)
        .await
        .unwrap();
        assert!(updated.changed);
        let stored = ctx.db.settings().get().await.unwrap();
        assert!(!stored.cascade_changes);
        assert_eq!(stored.time_increment, TimeIncrement::Thirty);
    }

    #[tokio::test]
    async fn test_show_json_lists_tracks_in_order() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 45)).await;

        let json = ShowCommand { json: true }.execute(&ctx.db).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tracks"][0]["id"], "photo");
        assert_eq!(value["tracks"][1]["id"], "video");
        assert_eq!(value["tracks"][2]["id"], "all");
        assert_eq!(value["tracks"][0]["entries"][0]["start"], "08:00");
        assert_eq!(value["tracks"][0]["entries"][0]["end"], "08:45");
    }

    #[tokio::test]
    async fn test_show_text_does_not_repair() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;
        ctx.seed(shot("b", "photo", 600, 30)).await;

        let text = ShowCommand { json: false }.execute(&ctx.db).await.unwrap();
        assert!(text.contains("10:00-10:30"));
        assert_eq!(ctx.start_of("b").await, 600);
    }

    #[tokio::test]
    async fn test_check_reports_gap_and_overlap() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;
        ctx.seed(shot("b", "photo", 600, 30)).await;
        ctx.seed(shot("v1", "video", 480, 60)).await;
        ctx.seed(shot("v2", "video", 500, 30)).await;

        let report = CheckCommand {}.execute(&ctx.db).await.unwrap();
        let kinds: Vec<&IssueKind> = report.issues.iter().map(|i| &i.kind).collect();
        assert!(kinds.contains(&&IssueKind::Gap));
        assert!(kinds.contains(&&IssueKind::Overlap));
        assert_eq!(report.count(ValidationSeverity::Warning), 2);
        assert!(!report.has_errors());
    }

    #[tokio::test]
    async fn test_check_clean_schedule() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        add_cmd("Hero", "photo", "30m").execute(&ctx.db).await.unwrap();
        add_cmd("Detail", "photo", "30m").execute(&ctx.db).await.unwrap();

        let report = CheckCommand {}.execute(&ctx.db).await.unwrap();
        assert_eq!(report.to_string(), "Schedule is consistent");
    }
}

// =============================================================================
// ERROR CASES
// =============================================================================

mod error_cases {
    use super::*;

    #[tokio::test]
    async fn test_add_to_unknown_track() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;

        let err = add_cmd("Hero", "drone", "30m").execute(&ctx.db).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Timeline(TimelineError::UnknownTrack { ref track_id }) if track_id == "drone"
        ));
        assert!(ctx.db.entries().list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_banner_with_unknown_target() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;

        let err = banner_cmd("Lunch", "all", "1h", &["photo", "drone"])
            .execute(&ctx.db)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Timeline(TimelineError::UnknownTrack { .. })));
    }

    #[tokio::test]
    async fn test_add_rejects_bad_duration() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;

        let err = add_cmd("Hero", "photo", "0m").execute(&ctx.db).await.unwrap_err();
        assert!(matches!(err, DbError::Timeline(TimelineError::InvalidDuration { .. })));

        let err = add_cmd("Hero", "photo", "later").execute(&ctx.db).await.unwrap_err();
        assert!(matches!(err, DbError::Timeline(TimelineError::InvalidDuration { .. })));
    }

    #[tokio::test]
    async fn test_add_past_midnight_refused() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("late", "photo", 1380, 50)).await;

        let err = add_cmd("Wrap", "photo", "30m").execute(&ctx.db).await.unwrap_err();
        assert!(matches!(err, DbError::Timeline(TimelineError::OutOfDayRange { .. })));
        assert_eq!(ctx.db.entries().list_active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resize_overflow_leaves_lane_untouched() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 1320, 30)).await;
        ctx.seed(shot("b", "photo", 1350, 60)).await;

        let err = resize_cmd("a", "2h").execute(&ctx.db).await.unwrap_err();
        assert!(matches!(err, DbError::Timeline(TimelineError::OutOfDayRange { .. })));
        assert_eq!(ctx.entry("a").await.duration, 30);
        assert_eq!(ctx.start_of("b").await, 1350);
    }

    #[tokio::test]
    async fn test_day_start_overflow_refused() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 600)).await;

        let err = DayStartCommand { time: 1200 }.execute(&ctx.db).await.unwrap_err();
        assert!(matches!(err, DbError::Timeline(TimelineError::OutOfDayRange { .. })));
        assert_eq!(ctx.start_of("a").await, 480);
        assert_eq!(ctx.db.settings().get().await.unwrap().day_start_time, 360);
    }

    #[tokio::test]
    async fn test_edit_unknown_entry() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;

        let err = retime_cmd("ghost", 480).execute(&ctx.db).await.unwrap_err();
        assert!(matches!(err, DbError::Timeline(TimelineError::UnknownEntry { .. })));

        let err = remove_cmd("ghost", false).execute(&ctx.db).await.unwrap_err();
        assert!(matches!(err, DbError::Timeline(TimelineError::UnknownEntry { .. })));
    }

    #[tokio::test]
    async fn test_move_to_unknown_track() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;
        ctx.seed(shot("a", "photo", 480, 30)).await;

        let err = move_cmd("a", "drone").execute(&ctx.db).await.unwrap_err();
        assert!(matches!(err, DbError::Timeline(TimelineError::UnknownTrack { .. })));
        assert_eq!(ctx.entry("a").await.track_id, "photo");
    }

    #[tokio::test]
    async fn test_duplicate_track_refused() {
        let ctx = TestContext::with_tracks(ScheduleSettings::default()).await;

        let err = track_cmd("Photo", false).execute(&ctx.db).await.unwrap_err();
        assert!(matches!(err, DbError::AlreadyExists { .. }));
    }
}
