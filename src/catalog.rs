// =============================================================================
// Stock Catalog — the tradable NSE universe and its reference prices
// =============================================================================
//
// Reference prices seed both the synthetic 5-year history (its final close)
// and the opening live quote of every symbol.

use serde::{Deserialize, Serialize};

/// Sector filter value that matches every stock.
pub const ALL_SECTORS: &str = "All";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub price: f64,
}

const LISTINGS: &[(&str, &str, &str, f64)] = &[
    // Banking
    ("HDFCBANK", "HDFC Bank", "Banking", 1600.0),
    ("ICICIBANK", "ICICI Bank", "Banking", 950.0),
    ("SBIN", "State Bank of India", "Banking", 750.0),
    ("AXISBANK", "Axis Bank", "Banking", 1100.0),
    ("KOTAKBANK", "Kotak Mahindra Bank", "Banking", 1800.0),
    ("PNB", "Punjab National Bank", "Banking", 110.0),
    ("BANKBARODA", "Bank of Baroda", "Banking", 260.0),
    ("IDFCFIRSTB", "IDFC First Bank", "Banking", 95.0),
    ("FEDERALBNK", "Federal Bank", "Banking", 160.0),
    ("INDUSINDBK", "IndusInd Bank", "Banking", 1500.0),
    // IT
    ("TCS", "Tata Consultancy Services", "IT", 3800.0),
    ("INFY", "Infosys", "IT", 1550.0),
    ("WIPRO", "Wipro", "IT", 450.0),
    ("HCLTECH", "HCL Technologies", "IT", 1400.0),
    ("TECHM", "Tech Mahindra", "IT", 1250.0),
    ("LTIM", "LTIMindtree", "IT", 5300.0),
    ("MPHASIS", "Mphasis", "IT", 2700.0),
    ("COFORGE", "Coforge", "IT", 5800.0),
    ("PERSISTENT", "Persistent Systems", "IT", 7200.0),
    // FMCG
    ("HINDUNILVR", "Hindustan Unilever", "FMCG", 2600.0),
    ("ITC", "ITC Limited", "FMCG", 450.0),
    ("NESTLEIND", "Nestle India", "FMCG", 24000.0),
    ("BRITANNIA", "Britannia Industries", "FMCG", 5000.0),
    ("DABUR", "Dabur India", "FMCG", 560.0),
    ("GODREJCP", "Godrej Consumer", "FMCG", 1250.0),
    ("COLPAL", "Colgate Palmolive", "FMCG", 2500.0),
    ("MARICO", "Marico", "FMCG", 610.0),
    // Energy
    ("RELIANCE", "Reliance Industries", "Energy", 2900.0),
    ("ONGC", "ONGC", "Energy", 280.0),
    ("BPCL", "BPCL", "Energy", 480.0),
    ("NTPC", "NTPC", "Energy", 360.0),
    ("ADANIGREEN", "Adani Green Energy", "Energy", 1850.0),
    ("ADANIPOWER", "Adani Power", "Energy", 720.0),
    ("TATAPOWER", "Tata Power", "Energy", 420.0),
    // Automobile
    ("TATAMOTORS", "Tata Motors", "Automobile", 950.0),
    ("MARUTI", "Maruti Suzuki", "Automobile", 10500.0),
    ("M&M", "Mahindra & Mahindra", "Automobile", 1650.0),
    ("BAJAJ-AUTO", "Bajaj Auto", "Automobile", 9200.0),
    ("EICHERMOT", "Eicher Motors", "Automobile", 3900.0),
    ("TVSMOTOR", "TVS Motor", "Automobile", 2100.0),
    ("ASHOKLEY", "Ashok Leyland", "Automobile", 180.0),
    ("OLA-ELEC", "Ola Electric", "Automobile", 140.0),
    // Metals
    ("TATASTEEL", "Tata Steel", "Metals", 140.0),
    ("JSWSTEEL", "JSW Steel", "Metals", 880.0),
    ("HINDALCO", "Hindalco Industries", "Metals", 620.0),
    // Pharma
    ("SUNPHARMA", "Sun Pharma", "Pharma", 1450.0),
    ("CIPLA", "Cipla", "Pharma", 1350.0),
    ("DRREDDY", "Dr Reddy's Labs", "Pharma", 5600.0),
    ("LUPIN", "Lupin", "Pharma", 1600.0),
    ("AUROPHARMA", "Aurobindo Pharma", "Pharma", 1150.0),
    ("TORNTPHARM", "Torrent Pharma", "Pharma", 3200.0),
    ("ALKEM", "Alkem Laboratories", "Pharma", 5200.0),
    // Infrastructure & cement
    ("LT", "Larsen & Toubro", "Infrastructure", 3700.0),
    ("ULTRACEMCO", "UltraTech Cement", "Cement", 10500.0),
    ("AMBUJACEM", "Ambuja Cements", "Cement", 630.0),
    ("SHREECEM", "Shree Cement", "Cement", 29000.0),
];

/// The full tradable universe, in listing order.
pub fn default_stocks() -> Vec<Stock> {
    LISTINGS
        .iter()
        .map(|&(symbol, name, sector, price)| Stock {
            symbol: symbol.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
            price,
        })
        .collect()
}

/// Look up a stock by exact symbol.
pub fn find<'a>(stocks: &'a [Stock], symbol: &str) -> Option<&'a Stock> {
    stocks.iter().find(|s| s.symbol == symbol)
}

/// Stocks whose name contains `search` (case-insensitive) and whose sector
/// equals `sector`. An empty search or [`ALL_SECTORS`] disables that filter.
pub fn filter<'a>(stocks: &'a [Stock], search: &str, sector: &str) -> Vec<&'a Stock> {
    let needle = search.trim().to_lowercase();
    stocks
        .iter()
        .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
        .filter(|s| sector.is_empty() || sector == ALL_SECTORS || s.sector == sector)
        .collect()
}

/// Distinct sectors in listing order.
pub fn sectors(stocks: &[Stock]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for s in stocks {
        if !out.contains(&s.sector.as_str()) {
            out.push(&s.sector);
        }
    }
    out
}
