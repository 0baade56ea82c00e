pub mod config;
pub mod entities;
pub mod error;
pub mod links;
pub mod models;
pub mod status;
pub mod templates;
pub mod validation;

// ============ 重新导出常用类型 ============

// 错误处理
pub use error::{CertError, Result as CertResult};

// 配置相关
pub use config::AppConfig;

// 状态推导
pub use status::{DerivedStatus, StatusBadge, derive_status};

// 模板分发
pub use templates::{CertificateView, TemplateVariant};

// 验证相关
pub use validation::{AssistedLookup, CertificateFields};

// 兼容性别名（Result 是更常用的名称）
pub use error::Result;
