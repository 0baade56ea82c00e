//! 输入校验
//!
//! 管理后台写入前的字段校验，以及公开查询的输入规整。

use crate::entities::certificates;
use crate::error::{CertError, Result};
use crate::models::{CreateCertificate, OperatorStatus, TemplateType, UpdateCertificate};
use chrono::NaiveDate;
use sea_orm::Set;

/// 公司名前缀的最小长度（字符数）
pub const MIN_PREFIX_CHARS: usize = 3;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 规整后的辅助查询输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistedLookup {
    pub company_prefix: String,
    pub certificate_number: String,
}

impl AssistedLookup {
    pub fn new(company_prefix: &str, certificate_number: &str) -> Result<Self> {
        let company_prefix = normalize_prefix(company_prefix)
            .ok_or_else(|| CertError::validation("prefix too short"))?;
        let certificate_number = normalize_certificate_number(certificate_number)?;
        Ok(Self {
            company_prefix,
            certificate_number,
        })
    }
}

/// 去掉首尾空白。去掉后不足三个字符时，若原输入带尾部空白，
/// 最多保留一个空格作为词间分隔：`"pt "` 是有效前缀，`"PT    "` 变成 `"PT "`，
/// 而 `"a  "` 仍算一个字符，被拒绝。
pub fn normalize_prefix(raw: &str) -> Option<String> {
    let leading_trimmed = raw.trim_start();
    let fully_trimmed = leading_trimmed.trim_end();
    if fully_trimmed.chars().count() >= MIN_PREFIX_CHARS {
        return Some(fully_trimmed.to_string());
    }
    let has_trailing_space = fully_trimmed.len() < leading_trimmed.len();
    if has_trailing_space && fully_trimmed.chars().count() + 1 >= MIN_PREFIX_CHARS {
        return Some(format!("{fully_trimmed} "));
    }
    None
}

pub fn normalize_certificate_number(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CertError::validation("certificate number required"));
    }
    Ok(trimmed.to_string())
}

pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| CertError::invalid_date(field, raw))
}

fn parse_opt_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(field, value).map(Some),
    }
}

fn required_text(field: &'static str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CertError::validation(format!("{} required", field.replace('_', " "))));
    }
    Ok(trimmed.to_string())
}

fn opt_text(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_status(raw: Option<&str>) -> Result<OperatorStatus> {
    match raw.map(str::trim) {
        None | Some("") => Ok(OperatorStatus::default()),
        Some(value) => OperatorStatus::parse(value)
            .ok_or_else(|| CertError::validation(format!("invalid status {}", value))),
    }
}

fn parse_template_type(raw: Option<&str>) -> Result<TemplateType> {
    match raw.map(str::trim) {
        None | Some("") => Ok(TemplateType::default()),
        Some(value) => TemplateType::parse(value)
            .ok_or_else(|| CertError::validation(format!("invalid template type {}", value))),
    }
}

/// 通过校验、可直接写库的证书字段（不含 id 与系统时间戳）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateFields {
    pub certificate_number: String,
    pub company_name: String,
    pub certificate_standard: String,
    pub certification_body: String,
    pub accreditation_body: String,
    pub issue_date: NaiveDate,
    pub surveillance_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub first_issue_date: Option<NaiveDate>,
    pub latest_issue_date: Option<NaiveDate>,
    pub recertification_date: Option<NaiveDate>,
    pub certification_approval_date: Option<NaiveDate>,
    pub original_audit_date: Option<NaiveDate>,
    pub certification_expiration_date: Option<NaiveDate>,
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
    pub status: OperatorStatus,
    pub template_type: TemplateType,
}

impl CertificateFields {
    fn check_invariants(self) -> Result<Self> {
        if self.expiry_date < self.issue_date {
            return Err(CertError::validation("expiry date must not be before issue date"));
        }
        Ok(self)
    }

    /// 覆盖 ActiveModel 上所有业务字段。
    pub fn apply_to(self, active: &mut certificates::ActiveModel) {
        active.certificate_number = Set(self.certificate_number);
        active.company_name = Set(self.company_name);
        active.certificate_standard = Set(self.certificate_standard);
        active.certification_body = Set(self.certification_body);
        active.accreditation_body = Set(self.accreditation_body);
        active.issue_date = Set(self.issue_date);
        active.surveillance_date = Set(self.surveillance_date);
        active.expiry_date = Set(self.expiry_date);
        active.first_issue_date = Set(self.first_issue_date);
        active.latest_issue_date = Set(self.latest_issue_date);
        active.recertification_date = Set(self.recertification_date);
        active.certification_approval_date = Set(self.certification_approval_date);
        active.original_audit_date = Set(self.original_audit_date);
        active.certification_expiration_date = Set(self.certification_expiration_date);
        active.ea_code = Set(self.ea_code);
        active.isic_code = Set(self.isic_code);
        active.certification_criteria = Set(self.certification_criteria);
        active.address = Set(self.address);
        active.certified_location = Set(self.certified_location);
        active.country = Set(self.country);
        active.issue = Set(self.issue);
        active.scope = Set(self.scope);
        active.trading_name = Set(self.trading_name);
        active.main_site_address = Set(self.main_site_address);
        active.other_sites = Set(self.other_sites);
        active.website = Set(self.website);
        active.managing_partner = Set(self.managing_partner);
        active.managing_practice = Set(self.managing_practice);
        active.status = Set(self.status.as_str().to_string());
        active.template_type = Set(self.template_type.as_str().to_string());
    }

    /// 同样的字段覆盖到已加载的 Model 上，供不经过数据库的实现使用。
    pub fn merge_into(self, model: &mut certificates::Model) {
        model.certificate_number = self.certificate_number;
        model.company_name = self.company_name;
        model.certificate_standard = self.certificate_standard;
        model.certification_body = self.certification_body;
        model.accreditation_body = self.accreditation_body;
        model.issue_date = self.issue_date;
        model.surveillance_date = self.surveillance_date;
        model.expiry_date = self.expiry_date;
        model.first_issue_date = self.first_issue_date;
        model.latest_issue_date = self.latest_issue_date;
        model.recertification_date = self.recertification_date;
        model.certification_approval_date = self.certification_approval_date;
        model.original_audit_date = self.original_audit_date;
        model.certification_expiration_date = self.certification_expiration_date;
        model.ea_code = self.ea_code;
        model.isic_code = self.isic_code;
        model.certification_criteria = self.certification_criteria;
        model.address = self.address;
        model.certified_location = self.certified_location;
        model.country = self.country;
        model.issue = self.issue;
        model.scope = self.scope;
        model.trading_name = self.trading_name;
        model.main_site_address = self.main_site_address;
        model.other_sites = self.other_sites;
        model.website = self.website;
        model.managing_partner = self.managing_partner;
        model.managing_practice = self.managing_practice;
        model.status = self.status.as_str().to_string();
        model.template_type = self.template_type.as_str().to_string();
    }
}

pub fn validate_create(payload: CreateCertificate) -> Result<CertificateFields> {
    CertificateFields {
        certificate_number: normalize_certificate_number(&payload.certificate_number)?,
        company_name: required_text("company_name", &payload.company_name)?,
        certificate_standard: required_text("certificate_standard", &payload.certificate_standard)?,
        certification_body: payload.certification_body.trim().to_string(),
        accreditation_body: payload.accreditation_body.trim().to_string(),
        issue_date: parse_date("issue_date", &payload.issue_date)?,
        surveillance_date: parse_date("surveillance_date", &payload.surveillance_date)?,
        expiry_date: parse_date("expiry_date", &payload.expiry_date)?,
        first_issue_date: parse_opt_date("first_issue_date", payload.first_issue_date.as_deref())?,
        latest_issue_date: parse_opt_date(
            "latest_issue_date",
            payload.latest_issue_date.as_deref(),
        )?,
        recertification_date: parse_opt_date(
            "recertification_date",
            payload.recertification_date.as_deref(),
        )?,
        certification_approval_date: parse_opt_date(
            "certification_approval_date",
            payload.certification_approval_date.as_deref(),
        )?,
        original_audit_date: parse_opt_date(
            "original_audit_date",
            payload.original_audit_date.as_deref(),
        )?,
        certification_expiration_date: parse_opt_date(
            "certification_expiration_date",
            payload.certification_expiration_date.as_deref(),
        )?,
        ea_code: opt_text(payload.ea_code),
        isic_code: opt_text(payload.isic_code),
        certification_criteria: opt_text(payload.certification_criteria),
        address: opt_text(payload.address),
        certified_location: opt_text(payload.certified_location),
        country: opt_text(payload.country),
        issue: opt_text(payload.issue),
        scope: opt_text(payload.scope),
        trading_name: opt_text(payload.trading_name),
        main_site_address: opt_text(payload.main_site_address),
        other_sites: opt_text(payload.other_sites),
        website: opt_text(payload.website),
        managing_partner: opt_text(payload.managing_partner),
        managing_practice: opt_text(payload.managing_practice),
        status: parse_status(payload.status.as_deref())?,
        template_type: parse_template_type(payload.template_type.as_deref())?,
    }
    .check_invariants()
}

/// 必填字段：未提供则沿用旧值，提供了则重新校验。
fn merge_required(
    field: &'static str,
    current: &str,
    incoming: Option<String>,
) -> Result<String> {
    match incoming {
        Some(value) => required_text(field, &value),
        None => Ok(current.to_string()),
    }
}

fn merge_date(
    field: &'static str,
    current: NaiveDate,
    incoming: Option<String>,
) -> Result<NaiveDate> {
    match incoming {
        Some(value) => parse_date(field, &value),
        None => Ok(current),
    }
}

/// 可选字段：`None` 沿用旧值，空字符串清空。
fn merge_opt_date(
    field: &'static str,
    current: Option<NaiveDate>,
    incoming: Option<String>,
) -> Result<Option<NaiveDate>> {
    match incoming {
        Some(value) => parse_opt_date(field, Some(value.as_str())),
        None => Ok(current),
    }
}

fn merge_opt_text(current: &Option<String>, incoming: Option<String>) -> Option<String> {
    match incoming {
        Some(value) => opt_text(Some(value)),
        None => current.clone(),
    }
}

/// 把部分更新合并到当前记录上并重新校验整条记录。
pub fn validate_update(
    current: &certificates::Model,
    payload: UpdateCertificate,
) -> Result<CertificateFields> {
    let certificate_number = match payload.certificate_number {
        Some(value) => normalize_certificate_number(&value)?,
        None => current.certificate_number.clone(),
    };
    let status = match payload.status {
        Some(value) => parse_status(Some(value.as_str()))?,
        None => OperatorStatus::parse(&current.status).unwrap_or_default(),
    };
    // 历史数据里可能有未知模板值，未修改时原样保留会在写回时被规整为默认值
    let template_type = match payload.template_type {
        Some(value) => parse_template_type(Some(value.as_str()))?,
        None => TemplateType::parse(&current.template_type).unwrap_or_default(),
    };

    CertificateFields {
        certificate_number,
        company_name: merge_required("company_name", &current.company_name, payload.company_name)?,
        certificate_standard: merge_required(
            "certificate_standard",
            &current.certificate_standard,
            payload.certificate_standard,
        )?,
        certification_body: payload
            .certification_body
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| current.certification_body.clone()),
        accreditation_body: payload
            .accreditation_body
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| current.accreditation_body.clone()),
        issue_date: merge_date("issue_date", current.issue_date, payload.issue_date)?,
        surveillance_date: merge_date(
            "surveillance_date",
            current.surveillance_date,
            payload.surveillance_date,
        )?,
        expiry_date: merge_date("expiry_date", current.expiry_date, payload.expiry_date)?,
        first_issue_date: merge_opt_date(
            "first_issue_date",
            current.first_issue_date,
            payload.first_issue_date,
        )?,
        latest_issue_date: merge_opt_date(
            "latest_issue_date",
            current.latest_issue_date,
            payload.latest_issue_date,
        )?,
        recertification_date: merge_opt_date(
            "recertification_date",
            current.recertification_date,
            payload.recertification_date,
        )?,
        certification_approval_date: merge_opt_date(
            "certification_approval_date",
            current.certification_approval_date,
            payload.certification_approval_date,
        )?,
        original_audit_date: merge_opt_date(
            "original_audit_date",
            current.original_audit_date,
            payload.original_audit_date,
        )?,
        certification_expiration_date: merge_opt_date(
            "certification_expiration_date",
            current.certification_expiration_date,
            payload.certification_expiration_date,
        )?,
        ea_code: merge_opt_text(&current.ea_code, payload.ea_code),
        isic_code: merge_opt_text(&current.isic_code, payload.isic_code),
        certification_criteria: merge_opt_text(
            &current.certification_criteria,
            payload.certification_criteria,
        ),
        address: merge_opt_text(&current.address, payload.address),
        certified_location: merge_opt_text(&current.certified_location, payload.certified_location),
        country: merge_opt_text(&current.country, payload.country),
        issue: merge_opt_text(&current.issue, payload.issue),
        scope: merge_opt_text(&current.scope, payload.scope),
        trading_name: merge_opt_text(&current.trading_name, payload.trading_name),
        main_site_address: merge_opt_text(&current.main_site_address, payload.main_site_address),
        other_sites: merge_opt_text(&current.other_sites, payload.other_sites),
        website: merge_opt_text(&current.website, payload.website),
        managing_partner: merge_opt_text(&current.managing_partner, payload.managing_partner),
        managing_practice: merge_opt_text(&current.managing_practice, payload.managing_practice),
        status,
        template_type,
    }
    .check_invariants()
}
