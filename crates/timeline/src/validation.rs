//! Schedule consistency checks
//!
//! Reports where a snapshot breaks the timeline invariants without changing
//! anything. Gaps and overlaps are what normalization repairs; the remaining
//! issues need a human.

use crate::models::ScheduleSnapshot;
use crate::time::{MINUTES_PER_DAY, minutes_to_time_string};
use crate::track::{lane_ids, lane_members};

/// Severity level for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// Breaks an invariant the engine relies on
    Error,
    /// Breaks gapless packing while cascade mode is on
    Warning,
    /// Worth a look, not wrong
    Note,
}

/// What a validation issue is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Idle minutes between two consecutive lane entries
    Gap,
    /// Two consecutive lane entries share minutes
    Overlap,
    /// Entry starts before 00:00 or ends after 24:00
    OutsideDay,
    /// Entry has no duration
    ZeroDuration,
    /// Entry belongs to a track the schedule does not have
    UnknownTrack,
    /// Banner on a shared track that targets a single lane
    SingleLaneBanner,
}

/// A single validation issue
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub severity: ValidationSeverity,
    /// Entry the issue was found on (the later one for gaps/overlaps)
    pub entry_id: String,
    pub track_id: String,
    /// Human-readable description of the issue
    pub message: String,
}

impl ValidationIssue {
    fn new(
        kind: IssueKind,
        severity: ValidationSeverity,
        entry_id: &str,
        track_id: &str,
        message: String,
    ) -> Self {
        Self {
            kind,
            severity,
            entry_id: entry_id.to_string(),
            track_id: track_id.to_string(),
            message,
        }
    }
}

/// All issues found in one snapshot
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Check if there are any blocking errors
    pub fn has_errors(&self) -> bool {
        self.count(ValidationSeverity::Error) > 0
    }

    /// Issues a normalization pass would fix
    pub fn repairable(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::Gap | IssueKind::Overlap))
            .collect()
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "Schedule is consistent");
        }

        let sections = [
            (ValidationSeverity::Error, "ERRORS"),
            (ValidationSeverity::Warning, "WARNINGS"),
            (ValidationSeverity::Note, "NOTES"),
        ];
        let mut first = true;
        for (severity, title) in sections {
            let matching: Vec<&ValidationIssue> =
                self.issues.iter().filter(|i| i.severity == severity).collect();
            if matching.is_empty() {
                continue;
            }
            if !first {
                writeln!(f)?;
            }
            first = false;
            writeln!(f, "{} ({}):", title, matching.len())?;
            for issue in matching {
                writeln!(f, "  - [{}] {}", issue.track_id, issue.message)?;
            }
        }
        Ok(())
    }
}

/// Check a snapshot against the timeline invariants.
pub fn validate_snapshot(snapshot: &ScheduleSnapshot) -> ValidationReport {
    let mut report = ValidationReport::default();
    let packing_severity = if snapshot.settings.cascade_changes {
        ValidationSeverity::Warning
    } else {
        ValidationSeverity::Note
    };

    for entry in &snapshot.entries {
        let Some(track) = snapshot.track(&entry.track_id) else {
            report.issues.push(ValidationIssue::new(
                IssueKind::UnknownTrack,
                ValidationSeverity::Error,
                &entry.id,
                &entry.track_id,
                format!("Entry '{}' is on unknown track '{}'", entry.id, entry.track_id),
            ));
            continue;
        };
        if entry.duration == 0 {
            report.issues.push(ValidationIssue::new(
                IssueKind::ZeroDuration,
                ValidationSeverity::Error,
                &entry.id,
                &track.id,
                format!("Entry '{}' has no duration", entry.id),
            ));
        }
        if entry.start_time >= MINUTES_PER_DAY || entry.end_time() > MINUTES_PER_DAY {
            report.issues.push(ValidationIssue::new(
                IssueKind::OutsideDay,
                ValidationSeverity::Error,
                &entry.id,
                &track.id,
                format!(
                    "Entry '{}' runs {}-{}, outside the day",
                    entry.id,
                    minutes_to_time_string(entry.start_time),
                    minutes_to_time_string(entry.end_time())
                ),
            ));
        }
        if !track.is_lane()
            && let Some(lane) = entry.single_target()
        {
            report.issues.push(ValidationIssue::new(
                IssueKind::SingleLaneBanner,
                ValidationSeverity::Note,
                &entry.id,
                &track.id,
                format!(
                    "Banner '{}' targets only lane '{}' and is packed with it",
                    entry.id, lane
                ),
            ));
        }
    }

    for lane in lane_ids(&snapshot.tracks) {
        let members = lane_members(&snapshot.entries, &snapshot.tracks, lane);
        for pair in members.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let expected = a.end_time();
            if b.start_time > expected {
                report.issues.push(ValidationIssue::new(
                    IssueKind::Gap,
                    packing_severity,
                    &b.id,
                    lane,
                    format!(
                        "{}m gap between '{}' and '{}' at {}",
                        b.start_time - expected,
                        a.id,
                        b.id,
                        minutes_to_time_string(expected)
                    ),
                ));
            } else if b.start_time < expected {
                report.issues.push(ValidationIssue::new(
                    IssueKind::Overlap,
                    packing_severity,
                    &b.id,
                    lane,
                    format!(
                        "'{}' overlaps '{}' by {}m at {}",
                        b.id,
                        a.id,
                        expected - b.start_time,
                        minutes_to_time_string(b.start_time)
                    ),
                ));
            }
        }
    }

    report
}
