pub mod forecast;
pub mod forecast_aggregator;
pub mod forecast_config;
pub mod forecast_error;
pub mod forecast_types;
pub mod monte_carlo;
pub mod percentiles;
pub mod record_cleaner;
pub mod throughput_distribution;
pub mod throughput_yaml;
pub mod window_selector;
pub mod work_item_file;
