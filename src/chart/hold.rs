//! Pairing hold and roll heads with their ends.

use std::collections::HashMap;

use crate::notes::NoteKind;

use super::TimedNote;

/// Rebuilds `notes` with the length of every hold and roll filled in.
///
/// A head is closed by the first [`NoteKind::End`] after it, in chart order, on the same lane. Its
/// length is the time between the two. A head with no such end keeps `hold_length` unset, which is
/// emitted as a zero-length hold later on.
///
/// `notes` must be in chart order, which is ascending by beat.
#[must_use]
pub fn resolve_holds(notes: &[TimedNote]) -> Vec<TimedNote> {
    let mut next_end: HashMap<usize, f64> = HashMap::new();
    let mut resolved: Vec<TimedNote> = notes
        .iter()
        .rev()
        .map(|&timed| match timed.note.kind {
            NoteKind::End => {
                next_end.insert(timed.note.lane, timed.time);
                timed
            }
            kind if kind.is_hold_head() => TimedNote {
                hold_length: next_end.get(&timed.note.lane).map(|end| end - timed.time),
                ..timed
            },
            _ => timed,
        })
        .collect();
    resolved.reverse();

    let unpaired = resolved
        .iter()
        .filter(|timed| timed.note.kind.is_hold_head() && timed.hold_length.is_none())
        .count();
    if unpaired > 0 {
        log::debug!("{unpaired} hold heads have no end, left without length");
    }
    resolved
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::notes::NoteEvent;

    fn timed(kind: NoteKind, lane: usize, time: f64) -> TimedNote {
        TimedNote {
            note: NoteEvent {
                tick: 0,
                kind,
                lane,
                quantization: 4,
                beat: time * 2.0,
            },
            time,
            hold_length: None,
        }
    }

    fn lengths(notes: &[TimedNote]) -> Vec<Option<f64>> {
        resolve_holds(notes)
            .iter()
            .map(|timed| timed.hold_length)
            .collect()
    }

    #[test]
    fn head_takes_the_first_end_on_its_lane() {
        let notes = [
            timed(NoteKind::Hold, 0, 0.0),
            timed(NoteKind::Roll, 1, 0.5),
            timed(NoteKind::End, 1, 1.0),
            timed(NoteKind::End, 0, 1.5),
            timed(NoteKind::Hold, 0, 2.0),
            timed(NoteKind::End, 0, 2.25),
        ];
        assert_eq!(
            lengths(&notes),
            vec![Some(1.5), Some(0.5), None, None, Some(0.25), None]
        );
    }

    #[test]
    fn nested_heads_on_a_lane_share_the_end() {
        let notes = [
            timed(NoteKind::Hold, 2, 0.0),
            timed(NoteKind::Hold, 2, 1.0),
            timed(NoteKind::End, 2, 3.0),
        ];
        assert_eq!(lengths(&notes), vec![Some(3.0), Some(2.0), None]);
    }

    #[test]
    fn unmatched_head_keeps_no_length() {
        let notes = [
            timed(NoteKind::End, 3, 0.0),
            timed(NoteKind::Hold, 3, 1.0),
            timed(NoteKind::End, 2, 2.0),
            timed(NoteKind::Tap, 3, 2.0),
        ];
        let resolved = resolve_holds(&notes);
        assert_eq!(resolved[1].hold_length, None);
        assert_eq!(resolved[3].hold_length, None);
        // Everything but the length is carried over.
        assert_eq!(
            resolved.iter().map(|timed| timed.note).collect::<Vec<_>>(),
            notes.iter().map(|timed| timed.note).collect::<Vec<_>>()
        );
    }
}
