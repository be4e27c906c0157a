mod common;
pub use self::common::{ChartRange, Interval, Query};

mod chart;
pub use self::chart::ChartQuery;
