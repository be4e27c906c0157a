mod chart;
pub use self::chart::{Chart, ChartError, ChartMeta, ChartResponse, ChartResult, Indicators, Quote};

mod price;
pub use self::price::DailyClose;
