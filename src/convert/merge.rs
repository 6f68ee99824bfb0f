//! Interleaving the opponent and player charts into one lane space.

use crate::{chart::TimedNote, notes::NoteKind};

/// Combines both sides into one stream ascending by beat.
///
/// Opponent lanes are moved up by `opponent_lane_shift`. Notes are copied, the inputs stay as they
/// are. On a shared beat, opponent notes come before player notes and each side keeps its own order.
///
/// [`NoteKind::End`] notes only bound holds, which are resolved by now, and [`NoteKind::Mine`] has no
/// counterpart in the output, so both are left out.
#[must_use]
pub fn merge_sides(
    opponent: &[TimedNote],
    player: &[TimedNote],
    opponent_lane_shift: usize,
) -> Vec<TimedNote> {
    let shifted = opponent.iter().map(|&timed| {
        let mut note = timed.note;
        note.lane += opponent_lane_shift;
        TimedNote { note, ..timed }
    });
    let mut mines = 0_usize;
    let mut merged: Vec<TimedNote> = shifted
        .chain(player.iter().copied())
        .filter(|timed| match timed.note.kind {
            NoteKind::End => false,
            NoteKind::Mine => {
                mines += 1;
                false
            }
            _ => true,
        })
        .collect();
    merged.sort_by(|a, b| a.note.beat.total_cmp(&b.note.beat));

    if mines > 0 {
        log::debug!("dropped {mines} mines");
    }
    merged
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::notes::NoteEvent;

    fn timed(kind: NoteKind, lane: usize, beat: f64) -> TimedNote {
        TimedNote {
            note: NoteEvent {
                tick: 0,
                kind,
                lane,
                quantization: 4,
                beat,
            },
            time: beat / 2.0,
            hold_length: None,
        }
    }

    #[test]
    fn opponent_lanes_are_shifted() {
        let opponent = [timed(NoteKind::Tap, 1, 0.0)];
        let player = [timed(NoteKind::Tap, 1, 0.0)];
        let merged = merge_sides(&opponent, &player, 4);
        let lanes: Vec<_> = merged.iter().map(|timed| timed.note.lane).collect();
        assert_eq!(lanes, vec![5, 1]);
        assert_eq!(opponent[0].note.lane, 1);
    }

    #[test]
    fn stream_is_sorted_and_stable() {
        let opponent = [
            timed(NoteKind::Tap, 0, 1.0),
            timed(NoteKind::Hold, 2, 3.0),
            timed(NoteKind::End, 2, 4.0),
        ];
        let player = [
            timed(NoteKind::Tap, 3, 0.5),
            timed(NoteKind::Tap, 0, 1.0),
            timed(NoteKind::Mine, 1, 2.0),
            timed(NoteKind::Fake, 2, 3.0),
        ];
        let merged: Vec<_> = merge_sides(&opponent, &player, 4)
            .iter()
            .map(|timed| (timed.note.beat, timed.note.lane, timed.note.kind))
            .collect();
        assert_eq!(
            merged,
            vec![
                (0.5, 3, NoteKind::Tap),
                (1.0, 4, NoteKind::Tap),
                (1.0, 0, NoteKind::Tap),
                (3.0, 6, NoteKind::Hold),
                (3.0, 2, NoteKind::Fake),
            ]
        );
    }
}
