//! Ranking over a published index: the bounded top-K selector and the
//! leaderboards built with it.

pub mod stats;
pub mod top_n;

pub use stats::{
    by_static_score, host_of_package, package_show_name, stat_tops, StatItem, StatList,
};
pub use top_n::TopN;
