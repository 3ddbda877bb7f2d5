pub mod dataset;
pub mod distribution;
pub mod drilldown;
pub mod series;
pub mod settings;
pub mod summary;
pub mod window;
