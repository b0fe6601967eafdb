//! Application views (screens).

mod result;

pub use result::{ResultView, TraceSummary};
