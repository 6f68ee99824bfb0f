use pretty_assertions::assert_eq;
use sm2fnf::prelude::*;

const FOUR_TAPS: &str = "\n1000\n0100\n0010\n0001\n;";

fn chart(steps_type: &str, difficulty: &str, meter: u32, notes: &str) -> SimfileChart {
    SimfileChart {
        steps_type: steps_type.into(),
        difficulty: difficulty.into(),
        meter,
        description: Some(format!("{difficulty} by someone")),
        notes: notes.into(),
        ..SimfileChart::default()
    }
}

fn simfile(kind: SimfileKind, charts: Vec<SimfileChart>) -> Simfile {
    Simfile {
        kind,
        header: SongHeader {
            title: "Bossy".into(),
            title_translit: String::new(),
            artist: "Kelis".into(),
            artist_translit: "  ".into(),
            timing: TimingTags {
                offset: Some("-0.050".into()),
                bpms: Some("0.000=120.000".into()),
                ..TimingTags::default()
            },
        },
        charts,
    }
}

#[test]
fn probe_keeps_slots_in_hardest_first_order() {
    let simfile = simfile(
        SimfileKind::Sm,
        vec![
            chart("dance-single", "Easy", 3, FOUR_TAPS),
            chart("dance-double", "Medium", 6, FOUR_TAPS),
            chart("dance-single", "Challenge", 11, FOUR_TAPS),
            chart("dance-single", "Hard", 9, FOUR_TAPS),
        ],
    );
    let catalog = ChartCatalog::probe(&simfile, "dance-single");
    assert_eq!(
        catalog.available(),
        vec![Difficulty::Challenge, Difficulty::Hard, Difficulty::Easy]
    );
    assert!(catalog.get(Difficulty::Medium).is_none());

    let hard = catalog.get(Difficulty::Hard).expect("hard loaded");
    assert_eq!(hard.info().meter, 9);
    assert_eq!(hard.info().credit, "Hard by someone");
    assert_eq!(hard.notes().len(), 4);
    assert_eq!(hard.timing().offset(), -0.05);
    assert_eq!(catalog.song_name().as_deref(), Some("Kelis - \"Bossy\""));
}

#[test]
fn probe_skips_unusable_slots() {
    let mut broken = simfile(
        SimfileKind::Ssc,
        vec![
            chart("dance-single", "Hard", 9, FOUR_TAPS),
            chart("dance-single", "Hard", 10, FOUR_TAPS),
            chart("dance-single", "Medium", 6, FOUR_TAPS),
            SimfileChart {
                timing: TimingTags {
                    bpms: Some("0=fast".into()),
                    ..TimingTags::default()
                },
                ..chart("dance-single", "Easy", 3, FOUR_TAPS)
            },
        ],
    );
    let catalog = ChartCatalog::probe(&broken, "dance-single");
    assert_eq!(catalog.available(), vec![Difficulty::Medium]);

    broken.charts.clear();
    let catalog = ChartCatalog::probe(&broken, "dance-single");
    assert!(catalog.is_empty());
    assert_eq!(catalog.song_name(), None);
    assert_eq!(TierAssignments::defaults(&catalog.available()), None);
}

#[test]
fn lookup_errors_are_reported() {
    let simfile = simfile(
        SimfileKind::Sm,
        vec![
            chart("dance-single", "Hard", 9, FOUR_TAPS),
            chart("dance-single", "hard", 10, FOUR_TAPS),
        ],
    );
    let hard = ChartQuery::new()
        .steps_type("dance-single")
        .difficulty(Difficulty::Hard);
    assert_eq!(
        ChartBundle::from_simfile(&simfile, &hard),
        Err(ConvertError::Lookup(ChartLookupError::AmbiguousChartFound {
            query: hard.clone(),
            count: 2
        }))
    );
    let easy = ChartQuery::new().difficulty(Difficulty::Easy);
    assert_eq!(
        ChartBundle::from_simfile(&simfile, &easy),
        Err(ConvertError::Lookup(ChartLookupError::NoChartFound {
            query: easy.clone()
        }))
    );
}

#[test]
fn malformed_timing_fails_the_load() {
    let mut simfile = simfile(
        SimfileKind::Sm,
        vec![chart("dance-single", "Hard", 9, FOUR_TAPS)],
    );
    simfile.header.timing.stops = Some("4.000".into());
    let query = ChartQuery::new().difficulty(Difficulty::Hard);
    assert!(matches!(
        ChartBundle::from_simfile(&simfile, &query),
        Err(ConvertError::MalformedTimingData(
            TimingError::MalformedPair { .. }
        ))
    ));
}

#[test]
fn ssc_chart_timing_overrides_the_song() {
    let own_timing = SimfileChart {
        timing: TimingTags {
            bpms: Some("0=240".into()),
            ..TimingTags::default()
        },
        credit: Some("charter".into()),
        ..chart("dance-single", "Challenge", 12, FOUR_TAPS)
    };
    let simfile = simfile(
        SimfileKind::Ssc,
        vec![own_timing, chart("dance-single", "Hard", 9, FOUR_TAPS)],
    );
    let catalog = ChartCatalog::probe(&simfile, "dance-single");

    let challenge = catalog.get(Difficulty::Challenge).expect("challenge loaded");
    assert_eq!(challenge.timing().initial_bpm(), 240.0);
    // The song offset is not inherited once the chart has timing of its own.
    assert_eq!(challenge.timing().offset(), 0.0);
    assert_eq!(challenge.info().credit, "charter");

    let hard = catalog.get(Difficulty::Hard).expect("hard loaded");
    assert_eq!(hard.timing().initial_bpm(), 120.0);
    assert_eq!(hard.timing().offset(), -0.05);
}

#[test]
fn request_runs_every_tier() {
    let simfile = simfile(
        SimfileKind::Sm,
        vec![
            chart("dance-single", "Challenge", 11, "1111\n;"),
            chart("dance-single", "Medium", 6, "1000\n;"),
        ],
    );
    let catalog = ChartCatalog::probe(&simfile, "dance-single");
    let assignments = TierAssignments::defaults(&catalog.available()).expect("two slots");
    let request = ConversionRequest::new("bossy-remix", assignments, ConvertConfig::default());
    let charts = request.run(&catalog).unwrap();

    let tiers: Vec<_> = charts.iter().map(|(tier, _)| *tier).collect();
    assert_eq!(tiers, OutputTier::ALL.to_vec());
    let player_notes: Vec<_> = charts
        .iter()
        .map(|(_, chart)| {
            chart.song.notes[1]
                .section_notes
                .iter()
                .filter(|note| note.lane() < 4)
                .count()
        })
        .collect();
    // Easy and normal play the medium chart, hard plays the challenge chart.
    assert_eq!(player_notes, vec![1, 1, 4]);
    assert!(charts.iter().all(|(_, chart)| chart.song.song == "Bossy Remix"));
}

#[test]
fn request_with_unloaded_slot() {
    let simfile = simfile(
        SimfileKind::Sm,
        vec![chart("dance-single", "Hard", 9, FOUR_TAPS)],
    );
    let catalog = ChartCatalog::probe(&simfile, "dance-single");
    let assignments = TierAssignments::uniform(SidePair {
        opponent: Difficulty::Hard,
        player: Difficulty::Beginner,
    });
    let request = ConversionRequest::new("bossy", assignments, ConvertConfig::default());
    assert_eq!(
        request.run(&catalog),
        Err(ConvertError::MissingSlot(Difficulty::Beginner))
    );
}
