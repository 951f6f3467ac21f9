//! §6 matcher contract (collaborator, scoring only — no storage backend).
//!
//! Given a query name and a corpus of `PartyRecord`s, scores every primary
//! name and alias by case-fold equality, Levenshtein edit distance, and a
//! Soundex phonetic key, returning the top-scoring rows.

use serde::Serialize;

use crate::record::PartyRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub sdn_entry_id: i64,
    pub matched_name: String,
    pub match_score: u8,
    pub edit_distance: usize,
}

/// Screen `name` against every primary name and alias in `corpus`.
///
/// `threshold` bounds the edit-distance tier (score 3); `limit` caps the
/// number of hits returned. Candidates are sorted by `(match_score asc,
/// edit_distance asc)`.
pub fn screen(corpus: &[PartyRecord], name: &str, threshold: u32, limit: usize) -> Vec<Hit> {
    let query = name.to_lowercase();
    let query_soundex = soundex(&query);

    let mut hits: Vec<Hit> = Vec::new();

    for record in corpus {
        let candidate_names = record
            .primary_name
            .iter()
            .map(|n| n.full_name.as_str())
            .chain(record.aliases.iter().map(|a| a.full_name.as_str()));

        for candidate in candidate_names {
            let candidate_lower = candidate.to_lowercase();
            let distance = levenshtein(&query, &candidate_lower);

            let score = if candidate_lower == query {
                1
            } else if distance <= 2 {
                2
            } else if distance as u32 <= threshold {
                3
            } else if soundex(&candidate_lower) == query_soundex {
                4
            } else {
                5
            };

            if score <= 4 {
                hits.push(Hit {
                    sdn_entry_id: record.sdn_entry_id,
                    matched_name: candidate.to_string(),
                    match_score: score,
                    edit_distance: distance,
                });
            }
        }
    }

    hits.sort_by(|a, b| {
        a.match_score
            .cmp(&b.match_score)
            .then(a.edit_distance.cmp(&b.edit_distance))
    });
    hits.truncate(limit);
    hits
}

/// Classical Levenshtein edit distance, case-sensitive on its inputs (callers
/// case-fold first).
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());

    if n == 0 {
        return m;
    }
    if m == 0 {
        return n;
    }

    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr = vec![0usize; m + 1];

    for i in 1..=n {
        curr[0] = i;
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

/// Classical American Soundex, operating on ASCII letters only; any other
/// character is skipped. Returns a 4-character code, upper-cased.
///
/// `H` and `W` are transparent: they neither get a code nor reset the
/// "last code seen" state, so two same-coded consonants separated only by
/// `H`/`W` collapse to one digit (e.g. "Ashcraft" → `A261`, not `A226`).
fn soundex(input: &str) -> String {
    fn code(c: char) -> u8 {
        match c.to_ascii_uppercase() {
            'B' | 'F' | 'P' | 'V' => 1,
            'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => 2,
            'D' | 'T' => 3,
            'L' => 4,
            'M' | 'N' => 5,
            'R' => 6,
            _ => 0,
        }
    }

    let letters: Vec<char> = input.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    let Some(&first) = letters.first() else {
        return String::new();
    };

    let mut out = String::new();
    out.push(first.to_ascii_uppercase());

    let mut last_code = code(first);
    for &c in &letters[1..] {
        if matches!(c.to_ascii_uppercase(), 'H' | 'W') {
            continue;
        }
        let c_code = code(c);
        if c_code != 0 && c_code != last_code {
            out.push((b'0' + c_code) as char);
        }
        last_code = c_code;
        if out.len() == 4 {
            break;
        }
    }

    while out.len() < 4 {
        out.push('0');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Alias, AliasQuality, Name};
    use chrono::Utc;

    fn record_with_primary(id: i64, full_name: &str) -> PartyRecord {
        let mut r = PartyRecord::new(id, None, Utc::now(), crate::constants::OFAC_SOURCE_URL);
        r.primary_name = Some(Name {
            full_name: full_name.to_string(),
            name_parts: Vec::new(),
        });
        r
    }

    #[test]
    fn exact_case_fold_match_scores_one() {
        let corpus = vec![record_with_primary(1, "Usama Bin Ladin")];
        let hits = screen(&corpus, "usama bin ladin", 2, 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].match_score, 1);
        assert_eq!(hits[0].edit_distance, 0);
    }

    #[test]
    fn close_typo_scores_two() {
        let corpus = vec![record_with_primary(1, "Smith")];
        let hits = screen(&corpus, "Smyth", 1, 10);
        assert_eq!(hits[0].match_score, 2);
    }

    #[test]
    fn soundex_fallback_scores_four() {
        let corpus = vec![record_with_primary(1, "Robert")];
        let hits = screen(&corpus, "Rupert", 0, 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].match_score, 4);
    }

    #[test]
    fn unrelated_name_is_not_a_candidate() {
        let corpus = vec![record_with_primary(1, "Zzyzyx")];
        let hits = screen(&corpus, "Anderson", 1, 10);
        assert!(hits.is_empty());
    }

    #[test]
    fn limit_caps_results() {
        let corpus: Vec<PartyRecord> = (0..5).map(|i| record_with_primary(i, "Smith")).collect();
        let hits = screen(&corpus, "Smith", 2, 3);
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn aliases_are_searched_too() {
        let mut r = record_with_primary(1, "Official Name");
        r.aliases.push(Alias {
            alias_type: "a.k.a.".to_string(),
            alias_quality: AliasQuality::Strong,
            full_name: "Nickname".to_string(),
            name_parts: Vec::new(),
        });
        let hits = screen(&[r], "nickname", 2, 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].matched_name, "Nickname");
    }

    #[test]
    fn soundex_matches_classic_examples() {
        assert_eq!(soundex("Robert"), "R163");
        assert_eq!(soundex("Rupert"), "R163");
        assert_eq!(soundex("Ashcraft"), "A261");
    }
}
