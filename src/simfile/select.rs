//! Picking one chart out of a simfile.

use thiserror::Error;

use super::{Difficulty, Simfile, SimfileChart};

/// Filters a chart has to pass to be selected. A filter left unset accepts anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ChartQuery {
    steps_type: Option<String>,
    difficulty: Option<Difficulty>,
}

impl ChartQuery {
    /// A query accepting every chart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            steps_type: None,
            difficulty: None,
        }
    }

    /// Requires `#STEPSTYPE` to be `steps_type`, ignoring case.
    #[must_use]
    pub fn steps_type(mut self, steps_type: impl Into<String>) -> Self {
        self.steps_type = Some(steps_type.into());
        self
    }

    /// Requires `#DIFFICULTY` to name `difficulty`, ignoring case.
    #[must_use]
    pub const fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Whether `chart` passes every filter.
    #[must_use]
    pub fn matches(&self, chart: &SimfileChart) -> bool {
        self.difficulty
            .is_none_or(|difficulty| difficulty.matches(&chart.difficulty))
            && self
                .steps_type
                .as_deref()
                .is_none_or(|steps_type| chart.steps_type.trim().eq_ignore_ascii_case(steps_type))
    }
}

impl std::fmt::Display for ChartQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            self.steps_type.as_deref().unwrap_or("<any type>"),
            self.difficulty.map_or("<any slot>", Difficulty::as_str),
        )
    }
}

/// An error occurred when selecting a chart.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartLookupError {
    /// No chart passed the query.
    #[error("couldn't find a {query} chart")]
    NoChartFound {
        /// The query that matched nothing.
        query: ChartQuery,
    },
    /// More than one chart passed the query.
    #[error("found {count} {query} charts, expected one")]
    AmbiguousChartFound {
        /// The query that matched too much.
        query: ChartQuery,
        /// How many charts matched.
        count: usize,
    },
}

/// Finds the single chart of `simfile` passing `query`.
///
/// # Errors
///
/// Returns [`ChartLookupError::NoChartFound`] if none passes, or
/// [`ChartLookupError::AmbiguousChartFound`] if more than one does.
pub fn find_chart<'a>(
    simfile: &'a Simfile,
    query: &ChartQuery,
) -> Result<&'a SimfileChart, ChartLookupError> {
    let mut matching = simfile.charts.iter().filter(|chart| query.matches(chart));
    let Some(found) = matching.next() else {
        return Err(ChartLookupError::NoChartFound {
            query: query.clone(),
        });
    };
    let others = matching.count();
    if others > 0 {
        return Err(ChartLookupError::AmbiguousChartFound {
            query: query.clone(),
            count: others + 1,
        });
    }
    Ok(found)
}
