pub mod drilldown_service;
pub mod seeded_source;
pub mod series_service;
pub mod stats_service;
pub mod window_service;
