//! Station-name autocompletion.

use crate::plan::Plan;

/// Which journey endpoint a suggestion is for.
///
/// Departure suggestions only offer stations with outbound edges; a pure
/// terminus is still a valid arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestKind {
    Departure,
    Arrival,
}

/// A station matching a suggestion prefix, with the lines serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationSuggestion {
    pub name: String,
    pub lines: Vec<String>,
}

/// Stations whose name starts with `prefix`, ignoring case and diacritics.
///
/// Returns an empty list on no match; never an error.
///
/// # Examples
///
/// ```
/// use transit_server::plan::Plan;
/// use transit_server::planner::{SuggestKind, suggest_stations};
///
/// let plan = Plan::new();
/// assert!(suggest_stations(&plan, "Ga", SuggestKind::Departure).is_empty());
/// ```
pub fn suggest_stations(plan: &Plan, prefix: &str, kind: SuggestKind) -> Vec<StationSuggestion> {
    let folded_prefix = fold(prefix);

    let mut matches: Vec<StationSuggestion> = plan
        .station_index()
        .filter(|(name, _)| fold(name.as_str()).starts_with(&folded_prefix))
        .filter(|(name, _)| match kind {
            SuggestKind::Departure => !plan.outgoing(name.as_str()).is_empty(),
            SuggestKind::Arrival => true,
        })
        .map(|(name, lines)| StationSuggestion {
            name: name.clone(),
            lines: lines.iter().cloned().collect(),
        })
        .collect();

    matches.sort_by(|a, b| a.name.cmp(&b.name));
    matches
}

/// Lowercase and strip the diacritics found in the network data.
fn fold(s: &str) -> String {
    s.chars().flat_map(fold_char).collect()
}

fn fold_char(c: char) -> impl Iterator<Item = char> {
    let folded: &[char] = match c {
        'à' | 'â' | 'ä' | 'á' => &['a'],
        'é' | 'è' | 'ê' | 'ë' => &['e'],
        'î' | 'ï' | 'í' => &['i'],
        'ô' | 'ö' | 'ó' => &['o'],
        'ù' | 'û' | 'ü' | 'ú' => &['u'],
        'ç' => &['c'],
        'œ' => &['o', 'e'],
        'æ' => &['a', 'e'],
        _ => return Fold::Single(c.to_lowercase()),
    };
    Fold::Mapped(folded.iter().copied().collect::<Vec<_>>().into_iter())
}

/// Either the stdlib lowercasing iterator or a mapped replacement.
enum Fold {
    Single(std::char::ToLowercase),
    Mapped(std::vec::IntoIter<char>),
}

impl Iterator for Fold {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self {
            Fold::Single(it) => it.next(),
            Fold::Mapped(it) => it.next(),
        }
    }
}
