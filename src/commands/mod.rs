//! CLI commands for apidup

pub mod check;
pub mod cluster;
pub mod compare;
pub mod dispatch;
pub mod report;
pub mod scan;
