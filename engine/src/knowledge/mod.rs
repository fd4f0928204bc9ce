//! Finance knowledge base: static reference data for tracked securities,
//! alias-index construction, and entity matching over raw text.

mod resolver;
mod securities;
pub mod seed;

pub use resolver::{EntityMatch, MatchType};
pub use securities::nasdaq_securities;

use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Market-cap weight applied to tickers without an explicit weight.
/// Used only for index-level aggregation, never per-ticker scoring.
pub const DEFAULT_MARKET_CAP_WEIGHT: f64 = 0.01;

/// One tracked security in the reference table.
#[derive(Debug, Clone)]
pub struct Security {
    pub symbol: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub sector: String,
    pub industry: String,
    pub entity_type: String,
    pub market_cap_weight: f64,
}

/// Immutable reference data plus the derived lookup structures used for
/// entity matching. Built once at startup and passed explicitly into the
/// resolver and aggregators, so tests can inject alternate tables.
pub struct FinanceKnowledgeBase {
    securities: Vec<Security>,
    symbols: HashSet<String>,
    alias_index: HashMap<String, Vec<String>>,
    company_names: HashSet<String>,
    weights: HashMap<String, f64>,
    pub(crate) cashtag_re: Regex,
    pub(crate) caps_re: Regex,
}

impl FinanceKnowledgeBase {
    pub fn new(securities: Vec<Security>) -> Self {
        let alias_index = Self::build_alias_index(&securities);
        let symbols = securities.iter().map(|s| s.symbol.clone()).collect();
        let company_names = securities
            .iter()
            .map(|s| s.name.to_lowercase())
            .collect();
        let weights = securities
            .iter()
            .map(|s| (s.symbol.clone(), s.market_cap_weight))
            .collect();
        Self {
            securities,
            symbols,
            alias_index,
            company_names,
            weights,
            cashtag_re: Regex::new(r"\$([A-Za-z]{1,5})\b").unwrap(),
            caps_re: Regex::new(r"\b[A-Z]{2,5}\b").unwrap(),
        }
    }

    /// Knowledge base over the default NASDAQ reference table.
    pub fn with_nasdaq_defaults() -> Self {
        Self::new(nasdaq_securities())
    }

    /// Lower-cased alias → candidate symbols. Keys cover the symbol itself,
    /// the full company name, and every alias; an ambiguous alias maps to all
    /// candidate symbols and ranking is left to the caller.
    pub fn build_alias_index(securities: &[Security]) -> HashMap<String, Vec<String>> {
        let mut index: HashMap<String, Vec<String>> = HashMap::new();
        for sec in securities {
            let mut keys = vec![sec.symbol.to_lowercase(), sec.name.to_lowercase()];
            keys.extend(sec.aliases.iter().map(|a| a.to_lowercase()));
            for key in keys {
                let entry = index.entry(key).or_default();
                if !entry.contains(&sec.symbol) {
                    entry.push(sec.symbol.clone());
                }
            }
        }
        index
    }

    pub fn securities(&self) -> &[Security] {
        &self.securities
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn alias_index(&self) -> &HashMap<String, Vec<String>> {
        &self.alias_index
    }

    pub(crate) fn is_company_name(&self, alias_lower: &str) -> bool {
        self.company_names.contains(alias_lower)
    }

    /// Static market-cap weight for index-level aggregation.
    pub fn market_cap_weight(&self, symbol: &str) -> f64 {
        self.weights
            .get(symbol)
            .copied()
            .unwrap_or(DEFAULT_MARKET_CAP_WEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_index_covers_symbol_name_and_aliases() {
        let kb = FinanceKnowledgeBase::with_nasdaq_defaults();
        let index = kb.alias_index();
        assert!(index.contains_key("aapl"));
        assert!(index.contains_key("apple inc."));
        assert!(index.contains_key("iphone"));
        assert_eq!(index["iphone"], vec!["AAPL".to_string()]);
    }

    #[test]
    fn test_shared_alias_maps_to_all_candidates() {
        let mut securities = nasdaq_securities();
        securities.push(Security {
            symbol: "TEST".to_string(),
            name: "Test Corp".to_string(),
            aliases: vec!["iphone".to_string()],
            sector: "Technology".to_string(),
            industry: "Testing".to_string(),
            entity_type: "stock".to_string(),
            market_cap_weight: 0.01,
        });
        let index = FinanceKnowledgeBase::build_alias_index(&securities);
        let candidates = &index["iphone"];
        assert!(candidates.contains(&"AAPL".to_string()));
        assert!(candidates.contains(&"TEST".to_string()));
    }

    #[test]
    fn test_market_cap_weight_default() {
        let kb = FinanceKnowledgeBase::with_nasdaq_defaults();
        assert!(kb.market_cap_weight("AAPL") > DEFAULT_MARKET_CAP_WEIGHT);
        assert_eq!(kb.market_cap_weight("ZZZZ"), DEFAULT_MARKET_CAP_WEIGHT);
    }
}
