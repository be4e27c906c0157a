use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ChartResult;

/// One daily close as reported by the feed. `close` is `None` for rows the
/// feed left blank; dropping them is the caller's decision.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

impl ChartResult {
    /// Zips bar timestamps with the close column, shifting each timestamp
    /// into the exchange timezone before taking its calendar date.
    pub fn daily_closes(&self) -> Vec<DailyClose> {
        let closes = self
            .indicators
            .quote
            .first()
            .map(|q| q.close.as_slice())
            .unwrap_or(&[]);
        self.timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, ts)| {
                let date = DateTime::from_timestamp(ts + self.meta.gmtoffset, 0)?.date_naive();
                Some(DailyClose {
                    date,
                    close: closes.get(i).copied().flatten(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChartMeta, Indicators, Quote};

    fn result_with(timestamp: Vec<i64>, close: Vec<Option<f64>>, gmtoffset: i64) -> ChartResult {
        ChartResult {
            meta: ChartMeta {
                symbol: "BTC-USD".to_string(),
                currency: Some("USD".to_string()),
                exchange_name: None,
                instrument_type: None,
                first_trade_date: None,
                regular_market_price: None,
                gmtoffset,
                timezone: None,
                data_granularity: Some("1d".to_string()),
            },
            timestamp,
            indicators: Indicators {
                quote: vec![Quote {
                    close,
                    ..Quote::default()
                }],
            },
        }
    }

    #[test]
    fn closes_follow_timestamps() {
        // 2024-01-01 and 2024-01-02 at 00:00 UTC
        let result = result_with(vec![1704067200, 1704153600], vec![Some(1.0), None], 0);
        let closes = result.daily_closes();
        assert_eq!(closes.len(), 2);
        assert_eq!(closes[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(closes[0].close, Some(1.0));
        assert_eq!(closes[1].close, None);
    }

    #[test]
    fn short_close_column_yields_missing_rows() {
        let result = result_with(vec![1704067200, 1704153600], vec![Some(1.0)], 0);
        let closes = result.daily_closes();
        assert_eq!(closes[1].close, None);
    }

    #[test]
    fn gmtoffset_shifts_calendar_date() {
        // 2024-01-02 04:00 UTC is still 2024-01-01 in New York (-5h)
        let result = result_with(vec![1704168000], vec![Some(1.0)], -18000);
        let closes = result.daily_closes();
        assert_eq!(closes[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
