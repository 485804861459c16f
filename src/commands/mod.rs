pub mod base_commands;
pub mod command_error;
pub mod completions_cmd;
pub mod distribution_cmd;
pub mod forecast_cmd;
pub mod history;
pub mod report_format;
