use pretty_assertions::assert_eq;
use sm2fnf::notes::{NoteKind, parse_notes_field};

const TWO_MEASURES: &str = r"
// measure 1
2000
0000
0100
0000
0010
0000
3000
0000
0001
0000
0000
0000
,  // measure 2
M000
0F00
00L0
0004
0000
0000
0000
0003
;
";

#[test]
fn twelfths_and_eighths() {
    let output = parse_notes_field(TWO_MEASURES);
    assert!(output.warnings.is_empty());
    assert_eq!(output.measures, 2);

    let summary: Vec<_> = output
        .notes
        .iter()
        .map(|note| (note.kind, note.lane, note.quantization))
        .collect();
    assert_eq!(
        summary,
        vec![
            (NoteKind::Hold, 0, 4),
            (NoteKind::Tap, 1, 12),
            (NoteKind::Tap, 2, 12),
            (NoteKind::End, 0, 4),
            (NoteKind::Tap, 3, 12),
            (NoteKind::Mine, 0, 4),
            (NoteKind::Fake, 1, 8),
            (NoteKind::Lift, 2, 4),
            (NoteKind::Roll, 3, 8),
            (NoteKind::End, 3, 8),
        ]
    );

    let beats: Vec<_> = output.notes.iter().map(|note| note.beat).collect();
    let expected = [
        0.0,
        2.0 / 3.0,
        4.0 / 3.0,
        2.0,
        8.0 / 3.0,
        4.0,
        4.5,
        5.0,
        5.5,
        7.5,
    ];
    for (beat, expected) in beats.iter().zip(expected) {
        assert!((beat - expected).abs() < 1e-12, "{beat} != {expected}");
    }
}

#[test]
fn notes_are_beat_ordered() {
    let output = parse_notes_field(TWO_MEASURES);
    assert!(output.notes.windows(2).all(|pair| pair[0].beat <= pair[1].beat));
}

#[test]
fn ticks_restart_every_measure() {
    let output = parse_notes_field("0000\n1000\n,\n1000\n0000\n0000\n0000\n;");
    let ticks: Vec<_> = output.notes.iter().map(|note| (note.tick, note.beat)).collect();
    assert_eq!(ticks, vec![(1, 2.0), (0, 4.0)]);
}
