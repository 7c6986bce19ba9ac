//! Answers rate queries: fetches the matching NBP series and shapes the result.
use crate::core::error::{
    MIN_QUOTATIONS, bad_request_from_count, count_in_range, not_found_from_upstream,
};
use crate::core::{
    MidRate, QueryMode, RateQuery, RateReport, RateSource, RateValue, RatesRequest, RatesResult,
    RatesSeries, Table, TradeRate,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub async fn answer(source: &dyn RateSource, query: &RateQuery) -> RatesResult<RateReport> {
    match &query.mode {
        QueryMode::DateLookup { date } => rate_on_date(source, &query.code, date).await,
        QueryMode::LastN { count } => mid_range_last(source, &query.code, *count).await,
        QueryMode::SpreadLastN { count } => max_spread_last(source, &query.code, *count).await,
    }
}

/// Mid rate published for `code` on `date`.
pub async fn rate_on_date(
    source: &dyn RateSource,
    code: &str,
    date: &str,
) -> RatesResult<RateReport> {
    let body = fetch_body(source, &RatesRequest::on_date(Table::A, code, date)).await?;
    let series = decode::<MidRate>(&body)?;
    let mid = series
        .first_mid()
        .ok_or_else(|| not_found_from_upstream(body.as_str()))?;

    Ok(RateReport {
        key: format!(
            "the average {} exchange rate dated {}",
            code.to_uppercase(),
            date
        ),
        value: RateValue::Scalar(mid),
    })
}

/// Lowest and highest mid rate among the last `count` quotations.
pub async fn mid_range_last(
    source: &dyn RateSource,
    code: &str,
    count: i64,
) -> RatesResult<RateReport> {
    let body = fetch_counted(source, Table::A, code, count).await?;
    let series = decode::<MidRate>(&body)?;
    let (minimum, maximum) = series
        .mid_range()
        .ok_or_else(|| not_found_from_upstream(body.as_str()))?;

    Ok(RateReport {
        key: format!(
            "the average {} exchange rate for the last {} quotations",
            code.to_uppercase(),
            count
        ),
        value: RateValue::Range { minimum, maximum },
    })
}

/// Widest ask/bid spread among the last `count` quotations.
pub async fn max_spread_last(
    source: &dyn RateSource,
    code: &str,
    count: i64,
) -> RatesResult<RateReport> {
    let body = fetch_counted(source, Table::C, code, count).await?;
    let series = decode::<TradeRate>(&body)?;

    Ok(RateReport {
        key: format!(
            "the biggest {} exchange rate difference for the last {} quotations",
            code.to_uppercase(),
            count
        ),
        value: RateValue::Scalar(series.max_spread()),
    })
}

/// Validates `count` and fetches the last-N series. A count below one is
/// rejected without contacting the upstream service; a count above the limit
/// still needs its reply, which becomes the error detail.
async fn fetch_counted(
    source: &dyn RateSource,
    table: Table,
    code: &str,
    count: i64,
) -> RatesResult<String> {
    if count < MIN_QUOTATIONS {
        debug!(count, "Rejecting quotation count below one");
        return Err(bad_request_from_count(count, None));
    }

    let request = RatesRequest::last(table, code, count);
    if count_in_range(count) {
        return fetch_body(source, &request).await;
    }

    debug!(count, "Rejecting quotation count above limit");
    let detail = match source.fetch_rates(&request).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, code = %request.code, "Upstream request failed");
            e.to_string()
        }
    };
    Err(bad_request_from_count(count, Some(detail.as_str())))
}

async fn fetch_body(source: &dyn RateSource, request: &RatesRequest) -> RatesResult<String> {
    source.fetch_rates(request).await.map_err(|e| {
        warn!(error = %e, code = %request.code, "Upstream request failed");
        not_found_from_upstream(e.to_string())
    })
}

fn decode<R: DeserializeOwned>(body: &str) -> RatesResult<RatesSeries<R>> {
    RatesSeries::<R>::parse(body).map_err(|e| {
        warn!(error = %e, response = %body, "Failed to parse rates response");
        not_found_from_upstream(body)
    })
}
