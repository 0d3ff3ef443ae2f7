//! Price fetching, raw frames, normalization and the response memo

pub mod frame;
pub mod memo;
pub mod normalize;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use frame::{ColumnKey, RawColumn, RawFrame};
pub use memo::{RequestKey, ResponseMemo};
pub use normalize::{normalize, resolve_close, CloseColumn, NormalizedSeries};
pub use provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
