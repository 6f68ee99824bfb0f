//! Converts StepMania simfile charts into Friday Night Funkin' song charts.
//!
//! StepMania charts are placed by beat on a tempo map of BPM changes and stops. FNF charts are placed
//! by milliseconds in fixed sixteen-step sections that each carry a single BPM. Converting means
//! timing every note, pairing two charts (one per side) into one lane space, then cutting the result
//! into sections whose BPMs reproduce how long their beats really last.
//!
//! Reading `.sm`/`.ssc` files into tagged fields and writing the JSON files are left to the caller.
//! This crate starts from a [`simfile::Simfile`] and ends at [`fnf::FnfChart`]s, which serialize
//! with `serde` into the layout the game reads.
//!
//! # Usage
//!
//! ```
//! use sm2fnf::prelude::*;
//!
//! let simfile = Simfile {
//!     header: SongHeader {
//!         title: "Test".into(),
//!         artist: "Someone".into(),
//!         timing: TimingTags {
//!             bpms: Some("0.000=120.000".into()),
//!             ..TimingTags::default()
//!         },
//!         ..SongHeader::default()
//!     },
//!     charts: vec![SimfileChart {
//!         steps_type: "dance-single".into(),
//!         difficulty: "Hard".into(),
//!         meter: 9,
//!         notes: "1000\n0100\n0010\n0001\n;".into(),
//!         ..SimfileChart::default()
//!     }],
//!     ..Simfile::default()
//! };
//!
//! let catalog = ChartCatalog::probe(&simfile, "dance-single");
//! let assignments = TierAssignments::defaults(&catalog.available()).expect("one slot loaded");
//! let request = ConversionRequest::new("test-song", assignments, ConvertConfig::default());
//! let charts = request.run(&catalog)?;
//!
//! assert_eq!(charts.len(), 3);
//! let (tier, chart) = &charts[1];
//! assert_eq!(tier.chart_file_name(&request.song), "test-song.json");
//! assert_eq!(chart.song.song, "Test Song");
//! assert_eq!(chart.bpm, 120);
//! # Ok::<(), ConvertError>(())
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for the input, output and configuration types. Enabled by default.
//! - `diagnostics`: rendering note field warnings with `ariadne`. Enabled by default.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod chart;
pub mod convert;
pub mod diagnostics;
pub mod fnf;
pub mod mixin;
pub mod notes;
pub mod prelude;
pub mod simfile;
pub mod timing;
