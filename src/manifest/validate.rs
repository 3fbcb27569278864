//! Reconciliation and consistency checks between recordings and supervisions

use std::collections::HashSet;
use tracing::{debug, warn};

use super::error::ValidationError;
use super::recording::RecordingSet;
use super::supervision::{round_secs, SupervisionSet};

/// Slack allowed when comparing a supervision end to its recording duration
const END_TOLERANCE_SECS: f64 = 1e-3;

/// Make the two sets agree with each other:
///
/// - supervisions pointing at an unknown recording are dropped
/// - recordings without any supervision are dropped
/// - supervisions running past the end of their recording are trimmed,
///   or dropped if they start at or after it
pub fn fix_manifests(
    mut recordings: RecordingSet,
    mut supervisions: SupervisionSet,
) -> (RecordingSet, SupervisionSet) {
    let before = supervisions.len();
    supervisions.retain(|s| recordings.contains(&s.recording_id));
    let orphans = before - supervisions.len();
    if orphans > 0 {
        warn!("Dropped {} supervisions without a matching recording", orphans);
    }

    let supervised: HashSet<String> = supervisions
        .iter()
        .map(|s| s.recording_id.clone())
        .collect();
    let before = recordings.len();
    recordings.retain(|r| supervised.contains(&r.id));
    let unsupervised = before - recordings.len();
    if unsupervised > 0 {
        warn!("Dropped {} recordings without any supervision", unsupervised);
    }

    let before = supervisions.len();
    supervisions.retain(|s| {
        recordings
            .get(&s.recording_id)
            .map_or(false, |r| s.start < r.duration)
    });
    let past_end = before - supervisions.len();
    if past_end > 0 {
        warn!("Dropped {} supervisions starting past their recording's end", past_end);
    }

    let mut trimmed = 0usize;
    for segment in supervisions.iter_mut() {
        if let Some(recording) = recordings.get(&segment.recording_id) {
            if segment.end() > recording.duration {
                debug!(
                    "Trimming {} from {:.3}s to recording end {:.3}s",
                    segment.id,
                    segment.end(),
                    recording.duration
                );
                segment.duration = round_secs(recording.duration - segment.start);
                trimmed += 1;
            }
        }
    }
    if trimmed > 0 {
        warn!("Trimmed {} supervisions to their recording's duration", trimmed);
    }

    (recordings, supervisions)
}

/// Check every structural invariant and report all violations at once
pub fn validate_recordings_and_supervisions(
    recordings: &RecordingSet,
    supervisions: &SupervisionSet,
) -> Result<(), ValidationError> {
    let mut problems = Vec::new();

    for r in recordings {
        if r.sampling_rate == 0 {
            problems.push(format!("recording {}: sampling rate is zero", r.id));
        }
        if !(r.duration > 0.0) {
            problems.push(format!("recording {}: non-positive duration {}", r.id, r.duration));
        }
    }

    for s in supervisions {
        if s.start < 0.0 {
            problems.push(format!("supervision {}: negative start {}", s.id, s.start));
        }
        if !(s.duration > 0.0) {
            problems.push(format!(
                "supervision {}: non-positive duration {}",
                s.id, s.duration
            ));
        }

        let Some(r) = recordings.get(&s.recording_id) else {
            problems.push(format!(
                "supervision {}: unknown recording {}",
                s.id, s.recording_id
            ));
            continue;
        };

        if !r.has_channel(s.channel) {
            problems.push(format!(
                "supervision {}: channel {} not in recording {} channels {:?}",
                s.id, s.channel, r.id, r.channel_ids
            ));
        }
        if s.end() > r.duration + END_TOLERANCE_SECS {
            problems.push(format!(
                "supervision {}: ends at {} past recording {} duration {}",
                s.id,
                s.end(),
                r.id,
                r.duration
            ));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { problems })
    }
}
