pub mod duration_policy;
pub mod throughput;
pub mod window;
pub mod work_item;
