// Rules, first hit wins: 1 equal names, 2 equal keys, 3/4 prefix, 5/6 suffix,
// 7 first candidate. Local lookup stops after rule 4.
// An empty key never matches, even another empty key.

use crate::models::{CoopEntry, MetadataRecord};
use crate::normalize::normalize;

pub trait Named {
    fn display_name(&self) -> &str;
}

impl Named for MetadataRecord {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Named for CoopEntry {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Named for String {
    fn display_name(&self) -> &str {
        self
    }
}

impl Named for &str {
    fn display_name(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocalMatch<'a, T> {
    None,
    Unique(&'a T),
    Ambiguous(Vec<&'a T>),
}

impl<T> LocalMatch<'_, T> {
    pub fn is_unique(&self) -> bool {
        matches!(self, LocalMatch::Unique(_))
    }
}

fn names_equal(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

struct Keyed<'a, 'k, T> {
    item: &'a T,
    key: &'k str,
}

pub fn keys_of<T: Named>(candidates: &[T]) -> Vec<String> {
    candidates
        .iter()
        .map(|item| normalize(item.display_name()))
        .collect()
}

fn keyed<'a, 'k, T>(candidates: &'a [T], keys: &'k [String]) -> Vec<Keyed<'a, 'k, T>> {
    candidates
        .iter()
        .zip(keys)
        .map(|(item, key)| Keyed { item, key })
        .collect()
}

fn same_key(query_key: &str, candidate_key: &str) -> bool {
    !query_key.is_empty() && query_key == candidate_key
}

#[derive(Debug, Clone, Copy)]
enum Affix {
    CandidatePrefix,
    QueryPrefix,
    CandidateSuffix,
    QuerySuffix,
}

impl Affix {
    const ALL: [Affix; 4] = [
        Affix::CandidatePrefix,
        Affix::QueryPrefix,
        Affix::CandidateSuffix,
        Affix::QuerySuffix,
    ];

    fn holds(self, query_key: &str, candidate_key: &str) -> bool {
        if query_key.is_empty() || candidate_key.is_empty() {
            return false;
        }
        match self {
            Affix::CandidatePrefix => query_key.starts_with(candidate_key),
            Affix::QueryPrefix => candidate_key.starts_with(query_key),
            Affix::CandidateSuffix => query_key.ends_with(candidate_key),
            Affix::QuerySuffix => candidate_key.ends_with(query_key),
        }
    }
}

pub fn match_metadata<'a, T: Named>(query: &str, candidates: &'a [T]) -> Option<&'a T> {
    let first = candidates.first()?;

    if let Some(exact) = candidates
        .iter()
        .find(|c| names_equal(c.display_name(), query))
    {
        return Some(exact);
    }

    let query_key = normalize(query);
    let keys = keys_of(candidates);
    let keyed = keyed(candidates, &keys);

    if let Some(c) = keyed.iter().find(|c| same_key(&query_key, c.key)) {
        return Some(c.item);
    }

    for rule in Affix::ALL {
        if let Some(c) = keyed.iter().find(|c| rule.holds(&query_key, c.key)) {
            return Some(c.item);
        }
    }

    Some(first)
}

pub fn match_local<'a, T: Named>(query: &str, candidates: &'a [T]) -> LocalMatch<'a, T> {
    let keys = keys_of(candidates);
    match_local_keyed(query, candidates, &keys)
}

/// Like [`match_local`], with `keys[i]` the precomputed key of `candidates[i]`.
/// Both exact rules must hit a single candidate.
pub fn match_local_keyed<'a, T: Named>(
    query: &str,
    candidates: &'a [T],
    keys: &[String],
) -> LocalMatch<'a, T> {
    let exact: Vec<&T> = candidates
        .iter()
        .filter(|c| names_equal(c.display_name(), query))
        .collect();
    if let Some(found) = unique_or_ambiguous(exact) {
        return found;
    }

    let query_key = normalize(query);
    let keyed = keyed(candidates, keys);

    let by_key: Vec<&T> = keyed
        .iter()
        .filter(|c| same_key(&query_key, c.key))
        .map(|c| c.item)
        .collect();
    if let Some(found) = unique_or_ambiguous(by_key) {
        return found;
    }

    for rule in [Affix::CandidatePrefix, Affix::QueryPrefix] {
        if let Some(c) = keyed.iter().find(|c| rule.holds(&query_key, c.key)) {
            return LocalMatch::Unique(c.item);
        }
    }

    LocalMatch::None
}

fn unique_or_ambiguous<T>(mut hits: Vec<&T>) -> Option<LocalMatch<'_, T>> {
    match hits.len() {
        0 => None,
        1 => hits.pop().map(LocalMatch::Unique),
        _ => Some(LocalMatch::Ambiguous(hits)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_name_beats_longer_candidate() {
        let c = names(&["Final Fantasy VII", "Final Fantasy VII Remake"]);
        assert_eq!(
            match_metadata("Final Fantasy VII", &c).map(String::as_str),
            Some("Final Fantasy VII")
        );
        let reversed = names(&["Final Fantasy VII Remake", "Final Fantasy VII"]);
        assert_eq!(
            match_metadata("final fantasy vii", &reversed).map(String::as_str),
            Some("Final Fantasy VII")
        );
    }

    #[test]
    fn normalized_key_match_handles_digits_and_accents() {
        let c = names(&["Okami HD Remaster", "Ōkami HD"]);
        assert_eq!(match_metadata("Okami HD", &c).map(String::as_str), Some("Ōkami HD"));
        let c = names(&["Gravity Rush II: Extras", "Gravity Rush II"]);
        assert_eq!(
            match_metadata("Gravity Rush 2", &c).map(String::as_str),
            Some("Gravity Rush II")
        );
    }

    #[test]
    fn prefix_rules_apply_in_order() {
        // Candidate key prefix of the query wins over query prefix of a candidate.
        let c = names(&["Uncharted Collection Deluxe", "Uncharted"]);
        assert_eq!(
            match_metadata("Uncharted Collection", &c).map(String::as_str),
            Some("Uncharted")
        );
        let c = names(&["Journey Collector's Edition"]);
        assert_eq!(
            match_metadata("Journey", &c).map(String::as_str),
            Some("Journey Collector's Edition")
        );
    }

    #[test]
    fn suffix_rules_and_fallback() {
        let c = names(&["Something Else", "Tomb Raider"]);
        assert_eq!(
            match_metadata("Rise of the Tomb Raider", &c).map(String::as_str),
            Some("Tomb Raider")
        );
        let c = names(&["Definitive Edition: Wild Arms"]);
        assert_eq!(
            match_metadata("Wild Arms", &c).map(String::as_str),
            Some("Definitive Edition: Wild Arms")
        );
        let c = names(&["Alpha", "Beta"]);
        assert_eq!(match_metadata("Gamma", &c).map(String::as_str), Some("Alpha"));
        let empty: Vec<String> = Vec::new();
        assert!(match_metadata("Gamma", &empty).is_none());
    }

    #[test]
    fn blank_keys_never_match_by_affix() {
        let c = names(&["!!!", "Knack"]);
        assert_eq!(match_local("Knack 2", &c), LocalMatch::Unique(&c[1]));
        assert_eq!(match_local("???", &c), LocalMatch::None);
    }

    #[test]
    fn local_lookup_reports_ambiguous_exact_names() {
        let c = names(&["Overcooked", "OVERCOOKED", "Overcooked 2"]);
        match match_local("overcooked", &c) {
            LocalMatch::Ambiguous(hits) => assert_eq!(hits.len(), 2),
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn local_lookup_reports_ambiguous_keys() {
        let c = names(&["Pokémon 3", "Pokemon III", "Pokemon"]);
        match match_local("pokemon 3!", &c) {
            LocalMatch::Ambiguous(hits) => {
                let hit_names = hits.iter().map(|s| s.as_str()).collect::<Vec<_>>();
                assert_eq!(hit_names, vec!["Pokémon 3", "Pokemon III"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn empty_keys_are_not_equal_keys() {
        // "!!!" and "???" both normalize to "", which must not count as rule 2.
        let c = names(&["Knack", "!!!"]);
        assert_eq!(normalize("???"), normalize("!!!"));
        assert_eq!(match_metadata("???", &c).map(String::as_str), Some("Knack"));
    }

    #[test]
    fn precomputed_keys_give_the_same_answer() {
        let c = names(&["Overcooked", "Lego Marvel Super Heroes 2"]);
        let keys = keys_of(&c);
        for query in ["overcooked", "LEGO Marvel Super Heroes", "Gran Turismo"] {
            assert_eq!(match_local_keyed(query, &c, &keys), match_local(query, &c));
        }
    }

    #[test]
    fn local_lookup_uses_only_prefix_rules() {
        let c = names(&["Tomb Raider"]);
        assert_eq!(match_local("Rise of the Tomb Raider", &c), LocalMatch::None);
        assert_eq!(match_local("Tomb Raider: Definitive", &c), LocalMatch::Unique(&c[0]));
        let c = names(&["Lego Marvel Super Heroes 2"]);
        assert!(match_local("LEGO Marvel Super Heroes", &c).is_unique());
        assert_eq!(match_local("Unrelated", &c), LocalMatch::None);
    }
}
