//! Entity matching over raw post text.

use super::FinanceKnowledgeBase;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Confidence assigned to symbol matches (cashtags and bare tickers).
const SYMBOL_CONFIDENCE: f64 = 0.95;
/// Confidence assigned to alias and company-name matches.
const ALIAS_CONFIDENCE: f64 = 0.85;
/// Confidence for cashtags naming a symbol outside the knowledge base.
const PATTERN_CONFIDENCE: f64 = 0.60;

/// Common acronyms and function words that look like tickers but are not.
/// Applied to bare all-caps tokens only; an explicit `$` cashtag bypasses it.
const STOP_ACRONYMS: &[&str] = &[
    "THE", "AND", "FOR", "ARE", "BUT", "NOT", "YOU", "ALL", "CAN", "HAS",
    "WAS", "ONE", "OUT", "NOW", "NEW", "GET", "SEE", "WHY", "WHO", "HOW",
    "CEO", "CFO", "CTO", "COO", "USA", "GDP", "IPO", "ETF", "SEC", "FED",
    "FDA", "NYSE", "EPS", "ATH", "IMO", "TLDR", "YOLO", "FOMO", "WSB",
    "DD", "EDIT", "HOLD", "BUY", "SELL", "CALLS", "PUTS", "USD", "EOD",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Symbol,
    Company,
    Alias,
    Pattern,
}

/// One resolved ticker mention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMatch {
    pub ticker: String,
    pub matched_text: String,
    pub match_type: MatchType,
    pub confidence: f64,
    pub position: usize,
}

impl FinanceKnowledgeBase {
    /// Scan raw text for ticker mentions.
    ///
    /// Three passes: cashtags and bare all-caps tokens (symbol matches,
    /// stop-list filtered), then alias-index substring matches with word
    /// boundaries on both sides. Results are deduplicated per ticker keeping
    /// the highest-confidence match, then sorted by text position ascending.
    /// Downstream consumers rely on at most one match per ticker per call.
    pub fn resolve_entities(&self, text: &str) -> Vec<EntityMatch> {
        let mut candidates: Vec<EntityMatch> = Vec::new();

        for cap in self.cashtag_re.captures_iter(text) {
            let whole = cap.get(0).unwrap();
            let symbol = cap[1].to_uppercase();
            if self.contains_symbol(&symbol) {
                candidates.push(EntityMatch {
                    ticker: symbol,
                    matched_text: whole.as_str().to_string(),
                    match_type: MatchType::Symbol,
                    confidence: SYMBOL_CONFIDENCE,
                    position: whole.start(),
                });
            } else {
                candidates.push(EntityMatch {
                    ticker: symbol,
                    matched_text: whole.as_str().to_string(),
                    match_type: MatchType::Pattern,
                    confidence: PATTERN_CONFIDENCE,
                    position: whole.start(),
                });
            }
        }

        for m in self.caps_re.find_iter(text) {
            let token = m.as_str();
            if STOP_ACRONYMS.contains(&token) {
                continue;
            }
            if self.contains_symbol(token) {
                candidates.push(EntityMatch {
                    ticker: token.to_string(),
                    matched_text: token.to_string(),
                    match_type: MatchType::Symbol,
                    confidence: SYMBOL_CONFIDENCE,
                    position: m.start(),
                });
            }
        }

        let text_lower = text.to_lowercase();
        for (alias, symbols) in self.alias_index() {
            for (pos, _) in text_lower.match_indices(alias.as_str()) {
                if !has_word_boundaries(&text_lower, pos, alias.len()) {
                    continue;
                }
                let matched_text = text
                    .get(pos..pos + alias.len())
                    .unwrap_or(alias)
                    .to_string();
                let match_type = if self.is_company_name(alias) {
                    MatchType::Company
                } else {
                    MatchType::Alias
                };
                for symbol in symbols {
                    candidates.push(EntityMatch {
                        ticker: symbol.clone(),
                        matched_text: matched_text.clone(),
                        match_type,
                        confidence: ALIAS_CONFIDENCE,
                        position: pos,
                    });
                }
            }
        }

        dedup_by_ticker(candidates)
    }
}

/// Requires non-alphanumeric (or text edge) on both sides of the match.
fn has_word_boundaries(text: &str, pos: usize, len: usize) -> bool {
    let before_ok = text[..pos]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[pos + len..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}

/// Keep the highest-confidence match per ticker (earliest, then longest, on
/// ties), sorted by position ascending.
fn dedup_by_ticker(candidates: Vec<EntityMatch>) -> Vec<EntityMatch> {
    let mut best: HashMap<String, EntityMatch> = HashMap::new();
    for m in candidates {
        match best.get(&m.ticker) {
            Some(existing) if !replaces(&m, existing) => {}
            _ => {
                best.insert(m.ticker.clone(), m);
            }
        }
    }
    let mut matches: Vec<EntityMatch> = best.into_values().collect();
    matches.sort_by_key(|m| m.position);
    matches
}

fn replaces(candidate: &EntityMatch, existing: &EntityMatch) -> bool {
    if candidate.confidence != existing.confidence {
        return candidate.confidence > existing.confidence;
    }
    if candidate.position != existing.position {
        return candidate.position < existing.position;
    }
    candidate.matched_text.len() > existing.matched_text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> FinanceKnowledgeBase {
        FinanceKnowledgeBase::with_nasdaq_defaults()
    }

    #[test]
    fn test_symbol_and_cashtag_resolution() {
        let matches = kb().resolve_entities("AAPL is up, $MSFT too");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].ticker, "AAPL");
        assert_eq!(matches[1].ticker, "MSFT");
        for m in &matches {
            assert_eq!(m.match_type, MatchType::Symbol);
            assert_eq!(m.confidence, 0.95);
        }
        assert!(matches[0].position < matches[1].position);
    }

    #[test]
    fn test_stop_list_exclusion() {
        let matches = kb().resolve_entities("the CEO said USA GDP rose");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_dedup_keeps_highest_confidence() {
        let matches = kb().resolve_entities("Apple beat earnings, AAPL calls printing");
        let apple: Vec<_> = matches.iter().filter(|m| m.ticker == "AAPL").collect();
        assert_eq!(apple.len(), 1);
        assert_eq!(apple[0].confidence, 0.95);
        assert_eq!(apple[0].match_type, MatchType::Symbol);
    }

    #[test]
    fn test_alias_match_requires_word_boundaries() {
        // "pineapple" contains "apple" without a boundary
        let matches = kb().resolve_entities("pineapple smoothies are great");
        assert!(matches.is_empty());

        let matches = kb().resolve_entities("apple had a strong quarter");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].ticker, "AAPL");
        assert_eq!(matches[0].match_type, MatchType::Alias);
        assert_eq!(matches[0].confidence, 0.85);
    }

    #[test]
    fn test_company_name_match_type() {
        let matches = kb().resolve_entities("Apple Inc. announced a buyback");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::Company);
    }

    #[test]
    fn test_unknown_cashtag_is_pattern_match() {
        let matches = kb().resolve_entities("$GME to the moon");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].ticker, "GME");
        assert_eq!(matches[0].match_type, MatchType::Pattern);
        assert!(matches[0].confidence < 0.95);
    }

    #[test]
    fn test_matches_sorted_by_position() {
        let matches = kb().resolve_entities("$TSLA dipped while nvidia and AMD rallied");
        let tickers: Vec<&str> = matches.iter().map(|m| m.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["TSLA", "NVDA", "AMD"]);
    }
}
