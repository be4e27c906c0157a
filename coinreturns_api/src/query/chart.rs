use url::Url;

use super::common::{Query, QueryCommon};

/// Query for the daily chart of a single symbol.
#[derive(Clone, Debug)]
pub struct ChartQuery {
    pub common: QueryCommon,
    pub symbol: String,
    pub include_adjusted_close: bool,
}

impl Query for ChartQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if self.include_adjusted_close {
            url.query_pairs_mut()
                .append_pair("includeAdjustedClose", "true");
        }
        url
    }
}

impl ChartQuery {
    pub fn new(symbol: &str) -> Self {
        Self {
            common: QueryCommon::default(),
            symbol: symbol.to_string(),
            include_adjusted_close: false,
        }
    }

    pub fn with_adjusted_close(mut self) -> Self {
        self.include_adjusted_close = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::query::{ChartQuery, ChartRange, Interval, Query};

    #[test]
    fn test_chart_query() {
        let url = Url::parse("https://example.com/v8/finance/chart/BTC-USD").unwrap();

        insta::assert_snapshot!(
            ChartQuery::new("BTC-USD").add_to_url(&url).to_string(),
            @"https://example.com/v8/finance/chart/BTC-USD?range=max&interval=1d"
        );

        insta::assert_snapshot!(
            ChartQuery::new("BTC-USD")
                .with_range(ChartRange::OneYear)
                .with_interval(Interval::OneWeek)
                .add_to_url(&url)
                .to_string(),
            @"https://example.com/v8/finance/chart/BTC-USD?range=1y&interval=1wk"
        );

        insta::assert_snapshot!(
            ChartQuery::new("BTC-USD")
                .with_adjusted_close()
                .add_to_url(&url)
                .to_string(),
            @"https://example.com/v8/finance/chart/BTC-USD?range=max&interval=1d&includeAdjustedClose=true"
        );
    }
}
