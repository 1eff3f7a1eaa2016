//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`AppResult`] - HTTP 边界错误类型
//! - [`logger`] - tracing 初始化
//! - [`time`] - 业务时区日期转换
//! - [`validation`] - 输入校验辅助

pub mod error;
pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, ok_with_message};
pub use result::AppResult;
