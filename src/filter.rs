//! Fuzzy subsequence filtering for browse mode.
//!
//! Matching is case-insensitive against group names only. Results are ranked
//! by match quality (consecutive runs and word boundaries score higher, gaps
//! score lower), not alphabetically — callers must not assume stable
//! alphabetical order here. Equal scores keep the input order.

/// Filter `groups` down to fuzzy matches of `query`, best matches first.
///
/// An empty query is the identity: the input order is preserved unchanged.
pub fn filter_groups(groups: &[String], query: &str) -> Vec<String> {
    if query.is_empty() {
        return groups.to_vec();
    }

    let mut scored: Vec<(i32, &String)> = groups
        .iter()
        .filter_map(|name| fuzzy_score(query, name).map(|score| (score, name)))
        .collect();
    // Stable sort: ties keep the caller's original ordering.
    scored.sort_by_key(|(score, _)| std::cmp::Reverse(*score));
    scored.into_iter().map(|(_, name)| name.clone()).collect()
}

/// Score `query` as a subsequence of `target`, or `None` when it is not one.
///
/// Scoring: +1 per matched char, +10 for extending a consecutive run, +5 for
/// matching at a word boundary, minus a capped gap penalty.
fn fuzzy_score(query: &str, target: &str) -> Option<i32> {
    let query_lower: Vec<char> = query.to_lowercase().chars().collect();
    let target_lower: Vec<char> = target.to_lowercase().chars().collect();

    let mut score: i32 = 0;
    let mut query_idx = 0;
    let mut prev_match_pos: Option<usize> = None;

    for (i, c) in target_lower.iter().enumerate() {
        if query_idx < query_lower.len() && *c == query_lower[query_idx] {
            if let Some(prev) = prev_match_pos {
                if i == prev + 1 {
                    score += 10;
                } else {
                    score -= (i - prev - 1).min(10) as i32;
                }
            }

            // Word boundary: start of name or after a non-alphanumeric
            // separator (`@`, `.`, `_` all count for capture-style names).
            let at_boundary = i == 0
                || target_lower
                    .get(i - 1)
                    .is_some_and(|prev| !prev.is_alphanumeric());
            if at_boundary {
                score += 5;
            }

            score += 1;
            prev_match_pos = Some(i);
            query_idx += 1;
        }
    }

    // Every query char must have matched, in order.
    (query_idx == query_lower.len()).then_some(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let groups = names(&["Visual", "Comment", "Normal"]);
        assert_eq!(filter_groups(&groups, ""), groups);
    }

    #[test]
    fn non_matching_names_are_dropped() {
        let groups = names(&["Normal", "Comment", "String"]);
        let out = filter_groups(&groups, "zzz");
        assert!(out.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_subsequence() {
        let groups = names(&["DiagnosticError", "Normal"]);
        let out = filter_groups(&groups, "dgerr");
        assert_eq!(out, names(&["DiagnosticError"]));
    }

    // Ensures consecutive runs outrank scattered matches of the same chars.
    #[test]
    fn consecutive_matches_rank_higher_than_scattered() {
        let groups = names(&["CursorLineNr", "Comment"]);
        let out = filter_groups(&groups, "comm");
        assert_eq!(out[0], "Comment");
    }

    #[test]
    fn capture_names_match_across_separators() {
        let groups = names(&["@punctuation", "Operator"]);
        let out = filter_groups(&groups, "punct");
        assert_eq!(out[0], "@punctuation");
    }

    #[test]
    fn ties_keep_input_order() {
        let groups = names(&["LineNr", "LineNrAbove", "LineNrBelow"]);
        let out = filter_groups(&groups, "linenr");
        // The exact-prefix names all match with identical leading runs; the
        // shortest (pure) match scores no lower, and input order is kept for
        // equal scores.
        assert_eq!(out[0], "LineNr");
    }
}
