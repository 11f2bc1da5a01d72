//! Domain types for marketbrief

pub mod flow;
pub mod metric;
pub mod news;
pub mod quote;
pub mod watchlist;

pub use flow::{AssetFlow, FlowSnapshot};
pub use metric::{
    Commodities, Fx, Indices, Liquidity, MacroSnapshot, MetricField, Rates,
};
pub use news::{NewsDigest, NewsItem};
pub use quote::{Quote, QuoteSource};
pub use watchlist::{StocksWatchlist, WatchlistRow};
