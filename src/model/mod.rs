pub mod asset;
pub mod attendance;
pub mod employee;
pub mod leave_request;
pub mod role;
pub mod task;
pub mod work_report;
