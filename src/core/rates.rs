//! Exchange-rate types, the upstream abstraction and the aggregation arithmetic

use crate::core::error::{NOT_A_COUNT, RatesError, RatesResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::Display;

/// NBP publishes mid rates in table A and bid/ask rates in table C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    A,
    C,
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Table::A => "a",
                Table::C => "c",
            }
        )
    }
}

/// Which slice of a currency's history to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatesSpan {
    Date(String),
    Last(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatesRequest {
    pub table: Table,
    pub code: String,
    pub span: RatesSpan,
}

impl RatesRequest {
    pub fn on_date(table: Table, code: &str, date: &str) -> Self {
        Self {
            table,
            code: code.to_string(),
            span: RatesSpan::Date(date.to_string()),
        }
    }

    pub fn last(table: Table, code: &str, count: i64) -> Self {
        Self {
            table,
            code: code.to_string(),
            span: RatesSpan::Last(count),
        }
    }
}

/// Source of raw rate series. Implementations return the response body as is;
/// decoding and interpretation happen in the caller.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self, request: &RatesRequest) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    DateLookup { date: String },
    LastN { count: i64 },
    SpreadLastN { count: i64 },
}

/// A single inbound question about one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuery {
    pub code: String,
    pub mode: QueryMode,
}

impl RateQuery {
    /// Classifies the `{code}/{segment}` form: an integer segment asks for the
    /// last N quotations, anything else is taken as a date.
    pub fn from_segment(code: &str, segment: &str) -> Self {
        let mode = match parse_count(segment) {
            Some(count) => QueryMode::LastN { count },
            None => QueryMode::DateLookup {
                date: segment.to_string(),
            },
        };
        Self {
            code: code.to_string(),
            mode,
        }
    }

    pub fn spread(code: &str, count: i64) -> Self {
        Self {
            code: code.to_string(),
            mode: QueryMode::SpreadLastN { count },
        }
    }

    /// The `difference/{code}/{number}` form, where the segment must be a count.
    pub fn spread_from_segment(code: &str, segment: &str) -> RatesResult<Self> {
        let count = parse_count(segment).ok_or_else(|| RatesError::BadRequest {
            detail: NOT_A_COUNT.to_string(),
        })?;
        Ok(Self::spread(code, count))
    }
}

/// Reads a quotation count: ASCII digits with an optional leading `-`.
/// Values beyond `i64` saturate, so they still fail the range check.
pub fn parse_count(segment: &str) -> Option<i64> {
    let (negative, digits) = match segment.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, segment),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(match segment.parse::<i64>() {
        Ok(count) => count,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MidRate {
    #[serde(default)]
    pub no: Option<String>,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    pub mid: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRate {
    #[serde(default)]
    pub no: Option<String>,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    pub bid: f64,
    pub ask: f64,
}

impl TradeRate {
    pub fn spread(&self) -> f64 {
        round_to(self.ask - self.bid, 4)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RatesSeries<R> {
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    pub rates: Vec<R>,
}

impl<R: DeserializeOwned> RatesSeries<R> {
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}

impl RatesSeries<MidRate> {
    pub fn first_mid(&self) -> Option<f64> {
        self.rates.first().map(|rate| rate.mid)
    }

    /// Lowest and highest mid rate, or `None` for an empty series.
    pub fn mid_range(&self) -> Option<(f64, f64)> {
        let mut mids = self.rates.iter().map(|rate| rate.mid);
        let first = mids.next()?;
        Some(mids.fold((first, first), |(min, max), mid| {
            (min.min(mid), max.max(mid))
        }))
    }
}

impl RatesSeries<TradeRate> {
    /// Widest rounded ask/bid spread. Starts from zero, so a series whose
    /// spreads are all non-positive reports `0.0`.
    pub fn max_spread(&self) -> f64 {
        self.rates
            .iter()
            .map(TradeRate::spread)
            .fold(0.0, |widest, spread| {
                if spread > widest { spread } else { widest }
            })
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RateValue {
    Scalar(f64),
    Range { minimum: f64, maximum: f64 },
}

/// A computed answer keyed by a sentence describing it. Serializes as a JSON
/// object with that single entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RateReport {
    pub key: String,
    pub value: RateValue,
}

impl Serialize for RateReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MID_SERIES: &str = r#"{
        "table": "A",
        "currency": "funt szterling",
        "code": "GBP",
        "rates": [
            {"no": "077/A/NBP/2023", "effectiveDate": "2023-04-20", "mid": 5.2296},
            {"no": "078/A/NBP/2023", "effectiveDate": "2023-04-21", "mid": 5.2086},
            {"no": "079/A/NBP/2023", "effectiveDate": "2023-04-24", "mid": 5.2176}
        ]
    }"#;

    const TRADE_SERIES: &str = r#"{
        "table": "C",
        "currency": "funt szterling",
        "code": "GBP",
        "rates": [
            {"no": "077/C/NBP/2023", "effectiveDate": "2023-04-20", "bid": 5.1883, "ask": 5.2931},
            {"no": "078/C/NBP/2023", "effectiveDate": "2023-04-21", "bid": 5.1706, "ask": 5.2750},
            {"no": "079/C/NBP/2023", "effectiveDate": "2023-04-24", "bid": 5.1540, "ask": 5.2582}
        ]
    }"#;

    fn trade(bid: f64, ask: f64) -> TradeRate {
        TradeRate {
            no: None,
            effective_date: None,
            bid,
            ask,
        }
    }

    #[test]
    fn test_segment_classification() {
        assert_eq!(
            RateQuery::from_segment("gbp", "10").mode,
            QueryMode::LastN { count: 10 }
        );
        assert_eq!(
            RateQuery::from_segment("gbp", "-3").mode,
            QueryMode::LastN { count: -3 }
        );
        assert_eq!(
            RateQuery::from_segment("gbp", "2023-01-02").mode,
            QueryMode::DateLookup {
                date: "2023-01-02".to_string()
            }
        );
    }

    #[test]
    fn test_segment_count_rules() {
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count("255"), Some(255));
        assert_eq!(parse_count("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_count("-99999999999999999999"), Some(i64::MIN));
        assert_eq!(parse_count("+5"), None);
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("1e3"), None);

        assert_eq!(
            RateQuery::from_segment("gbp", "99999999999999999999").mode,
            QueryMode::LastN { count: i64::MAX }
        );
        assert_eq!(
            RateQuery::from_segment("gbp", "+5").mode,
            QueryMode::DateLookup {
                date: "+5".to_string()
            }
        );
    }

    #[test]
    fn test_spread_segment_must_be_a_count() {
        assert_eq!(
            RateQuery::spread_from_segment("gbp", "12").unwrap(),
            RateQuery::spread("gbp", 12)
        );
        assert_eq!(
            RateQuery::spread_from_segment("gbp", "99999999999999999999").unwrap(),
            RateQuery::spread("gbp", i64::MAX)
        );
        assert_eq!(
            RateQuery::spread_from_segment("gbp", "ten").unwrap_err(),
            RatesError::BadRequest {
                detail: NOT_A_COUNT.to_string()
            }
        );
    }

    #[test]
    fn test_mid_series_decoding() {
        let series = RatesSeries::<MidRate>::parse(MID_SERIES).unwrap();
        assert_eq!(series.code.as_deref(), Some("GBP"));
        assert_eq!(series.rates.len(), 3);
        assert_eq!(
            series.rates[0].effective_date,
            NaiveDate::from_ymd_opt(2023, 4, 20)
        );
        assert_eq!(series.first_mid(), Some(5.2296));
        assert_eq!(series.mid_range(), Some((5.2086, 5.2296)));
    }

    #[test]
    fn test_mid_series_rejects_missing_fields() {
        assert!(RatesSeries::<MidRate>::parse(r#"{"rates": [{"bid": 1.0}]}"#).is_err());
        assert!(RatesSeries::<MidRate>::parse(r#"{"table": "A"}"#).is_err());
        assert!(RatesSeries::<MidRate>::parse("404 NotFound - Not Found - Brak danych").is_err());
    }

    #[test]
    fn test_empty_mid_series_has_no_range() {
        let series = RatesSeries::<MidRate>::parse(r#"{"rates": []}"#).unwrap();
        assert_eq!(series.first_mid(), None);
        assert_eq!(series.mid_range(), None);
    }

    #[test]
    fn test_max_spread() {
        let series = RatesSeries::<TradeRate>::parse(TRADE_SERIES).unwrap();
        assert_eq!(series.max_spread(), 0.1048);
    }

    #[test]
    fn test_max_spread_floors_at_zero() {
        let series = RatesSeries {
            table: None,
            currency: None,
            code: None,
            rates: vec![trade(4.5, 4.4), trade(4.6, 4.6)],
        };
        assert_eq!(series.max_spread(), 0.0);
    }

    #[test]
    fn test_spread_is_rounded() {
        assert_eq!(trade(5.1706, 5.2750).spread(), 0.1044);
        assert_eq!(round_to(0.123456, 4), 0.1235);
    }

    #[test]
    fn test_report_serializes_as_single_entry() {
        let report = RateReport {
            key: "the average GBP exchange rate for the last 3 quotations".to_string(),
            value: RateValue::Range {
                minimum: 5.2086,
                maximum: 5.2296,
            },
        };
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "the average GBP exchange rate for the last 3 quotations": {
                    "minimum": 5.2086,
                    "maximum": 5.2296
                }
            })
        );

        let scalar = RateReport {
            key: "k".to_string(),
            value: RateValue::Scalar(5.2768),
        };
        assert_eq!(serde_json::to_value(&scalar).unwrap(), json!({"k": 5.2768}));
    }
}
