//! Default NASDAQ reference table.
//!
//! Weights are rough market-cap shares within the tracked basket, refreshed
//! with knowledge-base version bumps rather than live data.

use super::Security;

struct Seed {
    symbol: &'static str,
    name: &'static str,
    aliases: &'static [&'static str],
    sector: &'static str,
    industry: &'static str,
    entity_type: &'static str,
    weight: f64,
}

const SEED: &[Seed] = &[
    Seed {
        symbol: "AAPL",
        name: "Apple Inc.",
        aliases: &["apple", "iphone", "macbook", "tim cook"],
        sector: "Technology",
        industry: "Consumer Electronics",
        entity_type: "stock",
        weight: 0.12,
    },
    Seed {
        symbol: "MSFT",
        name: "Microsoft Corporation",
        aliases: &["microsoft", "windows", "azure", "copilot", "satya nadella"],
        sector: "Technology",
        industry: "Software",
        entity_type: "stock",
        weight: 0.12,
    },
    Seed {
        symbol: "NVDA",
        name: "NVIDIA Corporation",
        aliases: &["nvidia", "geforce", "cuda", "jensen huang"],
        sector: "Technology",
        industry: "Semiconductors",
        entity_type: "stock",
        weight: 0.11,
    },
    Seed {
        symbol: "GOOGL",
        name: "Alphabet Inc.",
        aliases: &["google", "alphabet", "youtube", "android", "gemini", "sundar pichai"],
        sector: "Communication Services",
        industry: "Internet Content",
        entity_type: "stock",
        weight: 0.07,
    },
    Seed {
        symbol: "AMZN",
        name: "Amazon.com Inc.",
        aliases: &["amazon", "aws", "prime", "andy jassy"],
        sector: "Consumer Cyclical",
        industry: "Internet Retail",
        entity_type: "stock",
        weight: 0.07,
    },
    Seed {
        symbol: "META",
        name: "Meta Platforms Inc.",
        aliases: &["facebook", "instagram", "whatsapp", "zuckerberg", "zuck"],
        sector: "Communication Services",
        industry: "Internet Content",
        entity_type: "stock",
        weight: 0.05,
    },
    Seed {
        symbol: "TSLA",
        name: "Tesla Inc.",
        aliases: &["tesla", "cybertruck", "elon", "elon musk"],
        sector: "Consumer Cyclical",
        industry: "Auto Manufacturers",
        entity_type: "stock",
        weight: 0.04,
    },
    Seed {
        symbol: "AVGO",
        name: "Broadcom Inc.",
        aliases: &["broadcom"],
        sector: "Technology",
        industry: "Semiconductors",
        entity_type: "stock",
        weight: 0.04,
    },
    Seed {
        symbol: "COST",
        name: "Costco Wholesale Corporation",
        aliases: &["costco"],
        sector: "Consumer Defensive",
        industry: "Discount Stores",
        entity_type: "stock",
        weight: 0.02,
    },
    Seed {
        symbol: "NFLX",
        name: "Netflix Inc.",
        aliases: &["netflix"],
        sector: "Communication Services",
        industry: "Entertainment",
        entity_type: "stock",
        weight: 0.02,
    },
    Seed {
        symbol: "AMD",
        name: "Advanced Micro Devices Inc.",
        aliases: &["radeon", "ryzen", "lisa su"],
        sector: "Technology",
        industry: "Semiconductors",
        entity_type: "stock",
        weight: 0.02,
    },
    Seed {
        symbol: "ADBE",
        name: "Adobe Inc.",
        aliases: &["adobe", "photoshop"],
        sector: "Technology",
        industry: "Software",
        entity_type: "stock",
        weight: 0.015,
    },
    Seed {
        symbol: "PEP",
        name: "PepsiCo Inc.",
        aliases: &["pepsi", "pepsico"],
        sector: "Consumer Defensive",
        industry: "Beverages",
        entity_type: "stock",
        weight: 0.015,
    },
    Seed {
        symbol: "INTC",
        name: "Intel Corporation",
        aliases: &["intel"],
        sector: "Technology",
        industry: "Semiconductors",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "CSCO",
        name: "Cisco Systems Inc.",
        aliases: &["cisco"],
        sector: "Technology",
        industry: "Networking",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "QCOM",
        name: "QUALCOMM Incorporated",
        aliases: &["qualcomm", "snapdragon"],
        sector: "Technology",
        industry: "Semiconductors",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "TXN",
        name: "Texas Instruments Incorporated",
        aliases: &["texas instruments"],
        sector: "Technology",
        industry: "Semiconductors",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "AMGN",
        name: "Amgen Inc.",
        aliases: &["amgen"],
        sector: "Healthcare",
        industry: "Biotechnology",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "INTU",
        name: "Intuit Inc.",
        aliases: &["intuit", "turbotax", "quickbooks"],
        sector: "Technology",
        industry: "Software",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "SBUX",
        name: "Starbucks Corporation",
        aliases: &["starbucks"],
        sector: "Consumer Cyclical",
        industry: "Restaurants",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "AMAT",
        name: "Applied Materials Inc.",
        aliases: &["applied materials"],
        sector: "Technology",
        industry: "Semiconductor Equipment",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "PYPL",
        name: "PayPal Holdings Inc.",
        aliases: &["paypal", "venmo"],
        sector: "Financial Services",
        industry: "Payments",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "MU",
        name: "Micron Technology Inc.",
        aliases: &["micron"],
        sector: "Technology",
        industry: "Semiconductors",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "PLTR",
        name: "Palantir Technologies Inc.",
        aliases: &["palantir"],
        sector: "Technology",
        industry: "Software",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "COIN",
        name: "Coinbase Global Inc.",
        aliases: &["coinbase"],
        sector: "Financial Services",
        industry: "Crypto Exchanges",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "HOOD",
        name: "Robinhood Markets Inc.",
        aliases: &["robinhood"],
        sector: "Financial Services",
        industry: "Brokerage",
        entity_type: "stock",
        weight: 0.01,
    },
    Seed {
        symbol: "QQQ",
        name: "Invesco QQQ Trust",
        aliases: &["qqq trust", "nasdaq 100"],
        sector: "Financial Services",
        industry: "Exchange Traded Fund",
        entity_type: "etf",
        weight: 0.02,
    },
];

/// Materialize the default reference table.
pub fn nasdaq_securities() -> Vec<Security> {
    SEED.iter()
        .map(|s| Security {
            symbol: s.symbol.to_string(),
            name: s.name.to_string(),
            aliases: s.aliases.iter().map(|a| a.to_string()).collect(),
            sector: s.sector.to_string(),
            industry: s.industry.to_string(),
            entity_type: s.entity_type.to_string(),
            market_cap_weight: s.weight,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_symbols_unique() {
        let securities = nasdaq_securities();
        let mut symbols: Vec<&str> = securities.iter().map(|s| s.symbol.as_str()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), securities.len());
    }

    #[test]
    fn test_seed_weights_in_range() {
        for sec in nasdaq_securities() {
            assert!(sec.market_cap_weight > 0.0 && sec.market_cap_weight < 1.0);
        }
    }
}
