use serde::{Deserialize, Serialize};
use std::fmt;

/// 证书模板类型（存储在 `certificates.template_type`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    #[default]
    Americo,
    Modern,
    Classic,
    Siscert,
    Equal,
    Gresolve,
}

impl TemplateType {
    pub const ALL: [TemplateType; 6] = [
        Self::Americo,
        Self::Modern,
        Self::Classic,
        Self::Siscert,
        Self::Equal,
        Self::Gresolve,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Americo => "americo",
            Self::Modern => "modern",
            Self::Classic => "classic",
            Self::Siscert => "siscert",
            Self::Equal => "equal",
            Self::Gresolve => "gresolve",
        }
    }

    /// 未知取值返回 `None`，由调用方决定拒绝还是回退。
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 管理员手动设置的证书状态，与到期日推导出的状态相互独立。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl OperatorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Suspended => "Suspended",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

/// 管理后台创建证书的请求体。日期字段为 `YYYY-MM-DD` 字符串，在校验阶段解析。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateCertificate {
    pub certificate_number: String,
    pub company_name: String,
    pub certificate_standard: String,
    pub certification_body: String,
    pub accreditation_body: String,
    pub issue_date: String,
    pub surveillance_date: String,
    pub expiry_date: String,
    pub first_issue_date: Option<String>,
    pub latest_issue_date: Option<String>,
    pub recertification_date: Option<String>,
    pub certification_approval_date: Option<String>,
    pub original_audit_date: Option<String>,
    pub certification_expiration_date: Option<String>,
    pub ea_code: Option<String>,
    pub isic_code: Option<String>,
    pub certification_criteria: Option<String>,
    pub address: Option<String>,
    pub certified_location: Option<String>,
    pub country: Option<String>,
    pub issue: Option<String>,
    pub scope: Option<String>,
    pub trading_name: Option<String>,
    pub main_site_address: Option<String>,
    pub other_sites: Option<String>,
    pub website: Option<String>,
    pub managing_partner: Option<String>,
    pub managing_practice: Option<String>,
    pub status: Option<String>,
    pub template_type: Option<String>,
}

/// 部分更新。对可选字段传空字符串表示清空。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateCertificate {
    pub certificate_number: Option<String>,
    pub company_name: Option<String>,
    pub certificate_standard: Option<String>,
    pub certification_body: Option<String>,
    pub accreditation_body: Option<String>,
    pub issue_date: Option<String>,
    pub surveillance_date: Option<String>,
    pub expiry_date: Option<String>,
    pub first_issue_date: Option<String>,
    pub latest_issue_date: Option<String>,
    pub recertification_date: Option<String>,
    pub certification_approval_date: Option<String>,
    pub original_audit_date: Option<String>,
    pub certification_expiration_date: Option<String>,
    pub ea_code: Option<String>,
    pub isic_code: Option<String>,
    pub certification_criteria: Option<String>,
    pub address: Option<String>,
    pub certified_location: Option<String>,
    pub country: Option<String>,
    pub issue: Option<String>,
    pub scope: Option<String>,
    pub trading_name: Option<String>,
    pub main_site_address: Option<String>,
    pub other_sites: Option<String>,
    pub website: Option<String>,
    pub managing_partner: Option<String>,
    pub managing_practice: Option<String>,
    pub status: Option<String>,
    pub template_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistedLookupRequest {
    #[serde(default)]
    pub company_name_prefix: String,
    #[serde(default)]
    pub certificate_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificateListQuery {
    pub q: Option<String>,
    pub template_type: Option<String>,
    pub status: Option<String>,
}
