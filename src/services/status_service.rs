//! Status Service
//!
//! Logs the latest stored quote of every index. Read-only.

use crate::db::sqlite::LatestObservation;
use crate::error::Result;
use crate::services::query_service::QueryService;
use crate::state::AppState;
use tracing::info;

/// Format a price with thousands separators and two decimals (e.g. `2,510.00`)
pub fn format_price(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price.is_sign_negative() && price != 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}

/// One status line: name, price and collection time
pub fn status_line(obs: &LatestObservation) -> String {
    format!(
        "{:10} | {:>12} | collected: {}",
        obs.name,
        format_price(obs.price),
        obs.collected_at
    )
}

/// Status service for business logic
pub struct StatusService;

impl StatusService {
    /// Log the current status and return the rows it was built from
    pub fn report(state: &AppState) -> Result<Vec<LatestObservation>> {
        let latest = QueryService::latest_all(state)?;

        if latest.is_empty() {
            info!("Current index status: no data collected yet");
        } else {
            info!("Current index status:");
            for obs in &latest {
                info!("  {}", status_line(obs));
            }
        }

        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(2510.0), "2,510.00");
        assert_eq!(format_price(850.256), "850.26");
        assert_eq!(format_price(1234567.891), "1,234,567.89");
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_price(-1500.5), "-1,500.50");
    }

    #[test]
    fn test_status_line() {
        let obs = LatestObservation {
            name: "KOSPI".to_string(),
            ticker: "^KS11".to_string(),
            price: 2510.0,
            collected_at: "2024-03-04 09:01:00.000000".to_string(),
        };
        let line = status_line(&obs);
        assert!(line.starts_with("KOSPI "));
        assert!(line.contains("2,510.00"));
        assert!(line.ends_with("2024-03-04 09:01:00.000000"));
    }
}
