//! The Friday Night Funkin' song chart written for each output tier.
//!
//! With the `serde` feature, these types serialize with the key names the game reads
//! (`lengthInSteps`, `sectionNotes`, `changeBPM`, ...).

/// Steps of a regular section, i.e. sixteenth notes in four beats.
pub const STEPS_PER_SECTION: u32 = 16;

/// One note: `(time in ms, lane, hold length in ms)`.
///
/// Lanes `0..4` belong to the player, `4..8` to the opponent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FnfNote(pub f64, pub usize, pub f64);

impl FnfNote {
    /// Milliseconds from the start of the audio.
    #[must_use]
    pub const fn time_ms(&self) -> f64 {
        self.0
    }

    /// Lane index.
    #[must_use]
    pub const fn lane(&self) -> usize {
        self.1
    }

    /// Hold length in milliseconds, zero for a tap.
    #[must_use]
    pub const fn hold_ms(&self) -> f64 {
        self.2
    }
}

/// One section (measure) of the song.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FnfSection {
    /// Steps the section lasts, [`STEPS_PER_SECTION`] or 1 for a pickup.
    pub length_in_steps: u32,
    /// Tempo that makes the section last as long as its source beats do.
    pub bpm: f64,
    /// Always false, every section carries its own tempo in `bpm`.
    #[cfg_attr(feature = "serde", serde(rename = "changeBPM"))]
    pub change_bpm: bool,
    /// Always true.
    pub must_hit_section: bool,
    /// Notes of the section.
    pub section_notes: Vec<FnfNote>,
    /// Always 0.
    pub type_of_section: u32,
}

impl FnfSection {
    /// A regular section.
    #[must_use]
    pub const fn new(bpm: f64, section_notes: Vec<FnfNote>) -> Self {
        Self {
            length_in_steps: STEPS_PER_SECTION,
            bpm,
            change_bpm: false,
            must_hit_section: true,
            section_notes,
            type_of_section: 0,
        }
    }

    /// A one-step section without notes, used to delay the start of the chart.
    #[must_use]
    pub fn pickup(bpm: f64) -> Self {
        Self {
            length_in_steps: 1,
            ..Self::new(bpm, Vec::new())
        }
    }
}

/// The `song` object of the chart file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FnfSong {
    /// Display name of the song.
    pub song: String,
    /// The sections, pickup first if there is one.
    pub notes: Vec<FnfSection>,
    /// Displayed tempo.
    pub bpm: i64,
    /// Always 0.
    pub sections: usize,
    /// Always false.
    pub needs_voices: bool,
    /// Player character.
    pub player1: String,
    /// Opponent character.
    pub player2: String,
    /// Always empty.
    pub section_lengths: Vec<u32>,
    /// Scroll speed.
    pub speed: f64,
    /// Always true.
    pub valid_score: bool,
}

/// A whole chart file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FnfChart {
    /// The song.
    pub song: FnfSong,
    /// Displayed tempo, same as the song's.
    pub bpm: i64,
    /// Number of sections, pickup included.
    pub sections: usize,
}

/// Turns a song folder name into the name shown in game.
///
/// Dashes become spaces, then every run of letters is capitalized: first letter upper case, the
/// rest lower case.
///
/// ```
/// use sm2fnf::fnf::display_song_name;
///
/// assert_eq!(display_song_name("dad-battle"), "Dad Battle");
/// assert_eq!(display_song_name("MILF"), "Milf");
/// ```
#[must_use]
pub fn display_song_name(folder: &str) -> String {
    let mut in_word = false;
    folder
        .chars()
        .map(|c| if c == '-' { ' ' } else { c })
        .flat_map(|c| {
            let cased = c.is_alphabetic();
            let mapped: Vec<char> = match (cased, in_word) {
                (true, true) => c.to_lowercase().collect(),
                (true, false) => c.to_uppercase().collect(),
                (false, _) => vec![c],
            };
            in_word = cased;
            mapped
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn song_names_are_title_cased() {
        assert_eq!(display_song_name("bopeebo"), "Bopeebo");
        assert_eq!(display_song_name("my-new-SONG"), "My New Song");
        assert_eq!(display_song_name("2nd-wind"), "2Nd Wind");
        assert_eq!(display_song_name("it's-ok"), "It'S Ok");
        assert_eq!(display_song_name(""), "");
    }

    #[test]
    fn pickup_is_a_single_empty_step() {
        let pickup = FnfSection::pickup(-75.0);
        assert_eq!(pickup.length_in_steps, 1);
        assert!(pickup.section_notes.is_empty());
        assert_eq!(FnfSection::new(120.0, vec![]).length_in_steps, 16);
    }

    #[test]
    fn note_accessors() {
        let note = FnfNote(1500.0, 6, 250.0);
        assert_eq!(
            (note.time_ms(), note.lane(), note.hold_ms()),
            (1500.0, 6, 250.0)
        );
    }
}
