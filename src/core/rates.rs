//! Currency listing and EUR re-basing over a parsed rate document.
//!
//! The ECB publishes every rate relative to EUR, so converting to another
//! base is a single division per entry by the base currency's EUR rate.
//! All lookups walk the whole tree, so the envelope nesting of the upstream
//! document never matters.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use chrono::NaiveDate;
use roxmltree::{Document, Node};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::RatesError;
use super::rate::ExchangeRate;

/// The currency every upstream rate is quoted against. Never emitted as a row.
pub const REFERENCE_CURRENCY: &str = "EUR";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_ATTR: &str = "time";
const CURRENCY_ATTR: &str = "currency";
const RATE_ATTR: &str = "rate";

/// Returns every currency code present in the document plus EUR, sorted ordinally.
pub fn list_currencies(doc: &Document) -> Result<Vec<String>, RatesError> {
    let mut currencies: BTreeSet<String> = doc
        .descendants()
        .filter_map(|node| node.attribute(CURRENCY_ATTR))
        .map(str::to_string)
        .collect();

    if currencies.is_empty() {
        return Err(RatesError::Extraction(
            "no currency nodes found in the rate document".to_string(),
        ));
    }

    currencies.insert(REFERENCE_CURRENCY.to_string());
    debug!(count = currencies.len(), "Collected currency codes");
    Ok(currencies.into_iter().collect())
}

/// Re-bases every snapshot in `[start, end]` onto `base`.
///
/// Both bounds are inclusive and optional. Any unparsable value, or a
/// snapshot lacking `base`, fails the whole call. The result is ordered by
/// date, then currency code.
pub fn extract_rates(
    doc: &Document,
    base: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<ExchangeRate>, RatesError> {
    let mut rates = Vec::new();
    let mut retained = 0usize;

    let snapshots = doc
        .descendants()
        .filter_map(|node| node.attribute(TIME_ATTR).map(|time| (node, time)));

    for (node, time) in snapshots {
        let date = parse_date(time)?;
        if start.is_some_and(|start| date < start) || end.is_some_and(|end| date > end) {
            continue;
        }
        retained += 1;

        let euro_rates = snapshot_rates(node, date)?;
        let base_rate = *euro_rates
            .get(base)
            .ok_or_else(|| RatesError::CurrencyNotFound(base.to_string()))?;

        if base_rate.is_zero() {
            return Err(RatesError::Format(format!(
                "cannot re-base on a zero rate for {base} on {date}"
            )));
        }

        for (currency, rate) in euro_rates {
            let rebased = rate.checked_div(base_rate).ok_or_else(|| {
                RatesError::Format(format!(
                    "{currency} rate {rate} is out of range when re-based on {base} ({base_rate}) on {date}"
                ))
            })?;
            rates.push(ExchangeRate::new(currency, rebased, date));
        }
    }

    rates.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.currency_code.cmp(&b.currency_code))
    });

    debug!(
        base,
        snapshots = retained,
        rows = rates.len(),
        "Re-based rate snapshots"
    );
    Ok(rates)
}

/// Keeps only the rows dated on the most recent date present.
pub fn latest_rates(rates: Vec<ExchangeRate>) -> Result<Vec<ExchangeRate>, RatesError> {
    let latest = rates
        .iter()
        .map(|rate| rate.date)
        .max()
        .ok_or(RatesError::EmptyHistory)?;

    Ok(rates.into_iter().filter(|rate| rate.date == latest).collect())
}

fn parse_date(value: &str) -> Result<NaiveDate, RatesError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| RatesError::Format(format!("invalid snapshot date '{value}': {e}")))
}

// Digits with an optional sign and at most one '.', nothing else.
fn is_plain_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    all_digits(int) && frac.is_none_or(all_digits)
}

fn parse_rate(value: &str, currency: &str) -> Result<Decimal, RatesError> {
    let trimmed = value.trim();
    if !is_plain_decimal(trimmed) {
        return Err(RatesError::Format(format!(
            "invalid rate '{value}' for {currency}: expected a period-separated decimal"
        )));
    }
    Decimal::from_str(trimmed)
        .map_err(|e| RatesError::Format(format!("invalid rate '{value}' for {currency}: {e}")))
}

// EUR-denominated table for one snapshot, EUR itself included at 1.
fn snapshot_rates(node: Node, date: NaiveDate) -> Result<HashMap<String, Decimal>, RatesError> {
    let mut euro_rates = HashMap::new();

    for child in node.children().filter(Node::is_element) {
        match (child.attribute(CURRENCY_ATTR), child.attribute(RATE_ATTR)) {
            (Some(currency), Some(rate)) => {
                euro_rates.insert(currency.to_string(), parse_rate(rate, currency)?);
            }
            (Some(currency), None) => {
                return Err(RatesError::Format(format!(
                    "rate attribute is missing for {currency} on {date}"
                )));
            }
            (None, Some(_)) => {
                return Err(RatesError::Format(format!(
                    "currency attribute is missing on a rate entry dated {date}"
                )));
            }
            (None, None) => {}
        }
    }

    euro_rates.insert(REFERENCE_CURRENCY.to_string(), Decimal::ONE);
    Ok(euro_rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::parse_document;
    use rust_decimal_macros::dec;

    const HISTORY: &str = include_str!("../../tests/fixtures/eurofxref-hist.xml");

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn find<'a>(rates: &'a [ExchangeRate], code: &str, on: NaiveDate) -> &'a ExchangeRate {
        rates
            .iter()
            .find(|r| r.currency_code == code && r.date == on)
            .unwrap_or_else(|| panic!("no {code} row on {on}"))
    }

    #[test]
    fn test_list_currencies_sorted_with_eur() {
        let doc = parse_document(HISTORY).unwrap();
        let currencies = list_currencies(&doc).unwrap();
        assert_eq!(currencies, vec!["CHF", "EUR", "GBP", "JPY", "USD"]);
    }

    #[test]
    fn test_list_currencies_without_currency_nodes() {
        let doc = parse_document(r#"<Envelope><Cube time="2024-01-02"/></Envelope>"#).unwrap();
        let result = list_currencies(&doc);
        assert!(matches!(result, Err(RatesError::Extraction(_))));
    }

    #[test]
    fn test_rebase_single_snapshot() {
        let xml = r#"<Cube><Cube time="2024-01-02">
            <Cube currency="USD" rate="1.10"/>
            <Cube currency="GBP" rate="0.85"/>
        </Cube></Cube>"#;
        let doc = parse_document(xml).unwrap();

        let rates = extract_rates(&doc, "USD", None, None).unwrap();
        let day = date(2024, 1, 2);
        assert_eq!(
            rates,
            vec![
                ExchangeRate::new("EUR", dec!(1) / dec!(1.10), day),
                ExchangeRate::new("GBP", dec!(0.85) / dec!(1.10), day),
                ExchangeRate::new("USD", Decimal::ONE, day),
            ]
        );
    }

    #[test]
    fn test_eur_base_keeps_published_rates() {
        let doc = parse_document(HISTORY).unwrap();
        let rates = extract_rates(&doc, "EUR", None, None).unwrap();

        assert_eq!(rates.len(), 15);
        assert_eq!(find(&rates, "USD", date(2024, 1, 3)).rate, dec!(1.0919));
        assert_eq!(find(&rates, "EUR", date(2024, 1, 3)).rate, Decimal::ONE);
    }

    #[test]
    fn test_base_currency_converts_to_exactly_one() {
        let doc = parse_document(HISTORY).unwrap();
        for base in ["USD", "GBP", "JPY", "CHF", "EUR"] {
            let rates = extract_rates(&doc, base, None, None).unwrap();
            let own: Vec<_> = rates.iter().filter(|r| r.currency_code == base).collect();
            assert_eq!(own.len(), 3);
            assert!(own.iter().all(|r| r.rate == Decimal::ONE), "{base} != 1");
        }
    }

    #[test]
    fn test_rebase_round_trip_is_reciprocal() {
        let xml = r#"<Cube><Cube time="2024-03-01">
            <Cube currency="USD" rate="1.25"/>
        </Cube></Cube>"#;
        let doc = parse_document(xml).unwrap();
        let day = date(2024, 3, 1);

        let from_eur = extract_rates(&doc, "EUR", None, None).unwrap();
        let from_usd = extract_rates(&doc, "USD", None, None).unwrap();

        let eur_to_usd = find(&from_eur, "USD", day).rate;
        let usd_to_eur = find(&from_usd, "EUR", day).rate;
        assert_eq!(usd_to_eur, dec!(0.8));
        assert_eq!(eur_to_usd * usd_to_eur, Decimal::ONE);
    }

    #[test]
    fn test_rates_ordered_by_date_then_code() {
        let doc = parse_document(HISTORY).unwrap();
        let rates = extract_rates(&doc, "GBP", None, None).unwrap();

        assert_eq!(rates.first().unwrap().date, date(2024, 1, 2));
        assert_eq!(rates.last().unwrap().date, date(2024, 1, 4));
        assert!(rates.windows(2).all(|w| {
            (w[0].date, w[0].currency_code.as_str()) <= (w[1].date, w[1].currency_code.as_str())
        }));
        let first_day: Vec<_> = rates[..5].iter().map(|r| r.currency_code.as_str()).collect();
        assert_eq!(first_day, vec!["CHF", "EUR", "GBP", "JPY", "USD"]);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let doc = parse_document(HISTORY).unwrap();

        let rates = extract_rates(&doc, "USD", Some(date(2024, 1, 3)), Some(date(2024, 1, 4))).unwrap();
        assert_eq!(rates.len(), 10);
        assert!(rates.iter().all(|r| r.date >= date(2024, 1, 3)));

        let single = extract_rates(&doc, "USD", Some(date(2024, 1, 2)), Some(date(2024, 1, 2))).unwrap();
        assert_eq!(single.len(), 5);
        assert!(single.iter().all(|r| r.date == date(2024, 1, 2)));

        let only_end = extract_rates(&doc, "USD", None, Some(date(2024, 1, 2))).unwrap();
        assert_eq!(only_end.len(), 5);
    }

    #[test]
    fn test_range_without_snapshots_is_empty() {
        let doc = parse_document(HISTORY).unwrap();
        let rates = extract_rates(&doc, "USD", Some(date(2025, 1, 1)), None).unwrap();
        assert!(rates.is_empty());
    }

    #[test]
    fn test_unknown_base_currency_fails_whole_call() {
        let doc = parse_document(HISTORY).unwrap();
        let result = extract_rates(&doc, "XYZ", None, None);
        assert!(matches!(result, Err(RatesError::CurrencyNotFound(code)) if code == "XYZ"));
    }

    #[test]
    fn test_base_missing_from_one_snapshot_fails() {
        let xml = r#"<Cube>
            <Cube time="2024-01-03"><Cube currency="USD" rate="1.09"/></Cube>
            <Cube time="2024-01-02"><Cube currency="GBP" rate="0.86"/></Cube>
        </Cube>"#;
        let doc = parse_document(xml).unwrap();

        assert!(matches!(
            extract_rates(&doc, "USD", None, None),
            Err(RatesError::CurrencyNotFound(_))
        ));
        // Filtering out the offending snapshot makes the call succeed.
        let rates = extract_rates(&doc, "USD", Some(date(2024, 1, 3)), None).unwrap();
        assert_eq!(rates.len(), 2);
    }

    #[test]
    fn test_snapshots_found_at_any_depth() {
        let xml = r#"<Envelope><Data><Series>
            <Cube time="2024-01-02"><Cube currency="USD" rate="1.10"/></Cube>
        </Series></Data>
        <Cube time="2024-01-03"><Cube currency="USD" rate="1.20"/></Cube>
        </Envelope>"#;
        let doc = parse_document(xml).unwrap();

        let rates = extract_rates(&doc, "EUR", None, None).unwrap();
        assert_eq!(rates.len(), 4);
        assert_eq!(find(&rates, "USD", date(2024, 1, 2)).rate, dec!(1.10));
        assert_eq!(find(&rates, "USD", date(2024, 1, 3)).rate, dec!(1.20));
    }

    #[test]
    fn test_invalid_snapshot_date() {
        let xml = r#"<Cube><Cube time="02/01/2024"><Cube currency="USD" rate="1.1"/></Cube></Cube>"#;
        let doc = parse_document(xml).unwrap();
        assert!(matches!(
            extract_rates(&doc, "EUR", None, None),
            Err(RatesError::Format(_))
        ));
    }

    #[test]
    fn test_invalid_date_fails_even_outside_range() {
        let xml = r#"<Cube>
            <Cube time="2024-01-02"><Cube currency="USD" rate="1.1"/></Cube>
            <Cube time="not-a-date"><Cube currency="USD" rate="1.1"/></Cube>
        </Cube>"#;
        let doc = parse_document(xml).unwrap();
        let day = date(2024, 1, 2);
        assert!(matches!(
            extract_rates(&doc, "EUR", Some(day), Some(day)),
            Err(RatesError::Format(_))
        ));
    }

    #[test]
    fn test_invalid_rate_value() {
        let xml = r#"<Cube><Cube time="2024-01-02"><Cube currency="USD" rate="n/a"/></Cube></Cube>"#;
        let doc = parse_document(xml).unwrap();
        let err = extract_rates(&doc, "EUR", None, None).unwrap_err();
        assert!(matches!(err, RatesError::Format(_)));
        assert!(err.to_string().contains("USD"));
    }

    #[test]
    fn test_rate_must_be_plain_decimal() {
        for bad in ["1_000", "1e2", "1,5", "1.2.3", ".5", "5.", "0x10", "", "1 000"] {
            let xml = format!(
                r#"<Cube><Cube time="2024-01-02"><Cube currency="USD" rate="{bad}"/></Cube></Cube>"#
            );
            let doc = parse_document(&xml).unwrap();
            assert!(
                matches!(extract_rates(&doc, "EUR", None, None), Err(RatesError::Format(_))),
                "rate '{bad}' was accepted"
            );
        }
    }

    #[test]
    fn test_plain_decimal_rates_accepted() {
        for (raw, expected) in [("1000", dec!(1000)), ("1.5", dec!(1.5)), (" 0.86518 ", dec!(0.86518))] {
            let xml = format!(
                r#"<Cube><Cube time="2024-01-02"><Cube currency="USD" rate="{raw}"/></Cube></Cube>"#
            );
            let doc = parse_document(&xml).unwrap();
            let rates = extract_rates(&doc, "EUR", None, None).unwrap();
            assert_eq!(find(&rates, "USD", date(2024, 1, 2)).rate, expected);
        }
    }

    #[test]
    fn test_out_of_range_rebase() {
        let xml = r#"<Cube><Cube time="2024-01-02">
            <Cube currency="USD" rate="0.0000000000000000000000000001"/>
            <Cube currency="JPY" rate="150"/>
        </Cube></Cube>"#;
        let doc = parse_document(xml).unwrap();

        let err = extract_rates(&doc, "USD", None, None).unwrap_err();
        assert!(matches!(err, RatesError::Format(_)));
        assert!(err.to_string().contains("out of range"));
        assert!(!err.to_string().contains("zero rate"));
    }

    #[test]
    fn test_missing_rate_attribute() {
        let xml = r#"<Cube><Cube time="2024-01-02"><Cube currency="USD"/></Cube></Cube>"#;
        let doc = parse_document(xml).unwrap();
        assert!(matches!(
            extract_rates(&doc, "EUR", None, None),
            Err(RatesError::Format(_))
        ));
    }

    #[test]
    fn test_missing_currency_attribute() {
        let xml = r#"<Cube><Cube time="2024-01-02"><Cube rate="1.1"/></Cube></Cube>"#;
        let doc = parse_document(xml).unwrap();
        assert!(matches!(
            extract_rates(&doc, "EUR", None, None),
            Err(RatesError::Format(_))
        ));
    }

    #[test]
    fn test_zero_base_rate() {
        let xml = r#"<Cube><Cube time="2024-01-02"><Cube currency="XXX" rate="0"/></Cube></Cube>"#;
        let doc = parse_document(xml).unwrap();
        let err = extract_rates(&doc, "XXX", None, None).unwrap_err();
        assert!(matches!(err, RatesError::Format(_)));
        assert!(err.to_string().contains("zero rate"));
    }

    #[test]
    fn test_latest_rates_selects_max_date() {
        let doc = parse_document(HISTORY).unwrap();
        let rates = extract_rates(&doc, "USD", None, None).unwrap();

        let latest = latest_rates(rates).unwrap();
        assert_eq!(latest.len(), 5);
        assert!(latest.iter().all(|r| r.date == date(2024, 1, 4)));
    }

    #[test]
    fn test_latest_rates_of_empty_history() {
        assert!(matches!(latest_rates(Vec::new()), Err(RatesError::EmptyHistory)));
    }
}
