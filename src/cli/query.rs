use crate::core::{RateQuery, RateReport, RateSource, RateValue};
use crate::exchange;
use anyhow::{Result, anyhow};
use console::style;

/// Answers a single query and prints the report to stdout.
pub async fn run(source: &dyn RateSource, query: &RateQuery, json: bool) -> Result<()> {
    match exchange::answer(source, query).await {
        Ok(report) => {
            println!("{}", render(&report, json)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", style(e.status().as_str()).red().bold(), e.detail());
            Err(anyhow!("Query failed with status {}", e.status()))
        }
    }
}

pub fn render(report: &RateReport, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let value = match report.value {
        RateValue::Scalar(v) => style(v).green().to_string(),
        RateValue::Range { minimum, maximum } => format!(
            "minimum {}, maximum {}",
            style(minimum).green(),
            style(maximum).green()
        ),
    };
    Ok(format!("{}: {}", style(&report.key).bold(), value))
}
