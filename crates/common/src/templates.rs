//! 证书模板分发
//!
//! `template_type` 决定使用哪种版式。分发是封闭的：`modern`、`classic`
//! 以及任何无法识别的取值都回退到 `americo`。每种版式只声明自己展示的字段，
//! 缺失的可选字段整段省略，不会报错。

use crate::entities::certificates;
use crate::models::{OperatorStatus, TemplateType};
use crate::status::{StatusBadge, derive_status};
use chrono::NaiveDate;
use serde::Serialize;

/// 实际可渲染的版式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVariant {
    Americo,
    Siscert,
    Equal,
    Gresolve,
}

/// 版式展示哪些状态。到期推导的状态总是展示，部分版式另外展示人工状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDisplay {
    Derived,
    Both,
}

impl TemplateVariant {
    pub fn dispatch(raw: &str) -> Self {
        match TemplateType::parse(raw) {
            Some(TemplateType::Siscert) => Self::Siscert,
            Some(TemplateType::Equal) => Self::Equal,
            Some(TemplateType::Gresolve) => Self::Gresolve,
            Some(TemplateType::Americo | TemplateType::Modern | TemplateType::Classic) | None => {
                Self::Americo
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Americo => "americo",
            Self::Siscert => "siscert",
            Self::Equal => "equal",
            Self::Gresolve => "gresolve",
        }
    }

    pub fn status_display(&self) -> StatusDisplay {
        match self {
            Self::Americo | Self::Equal => StatusDisplay::Derived,
            Self::Siscert | Self::Gresolve => StatusDisplay::Both,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Americo | Self::Siscert | Self::Gresolve => "Certificate of Registration",
            Self::Equal => "Certificate of Approval",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSection {
    pub heading: &'static str,
    pub fields: Vec<ViewField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorStatusView {
    pub status: OperatorStatus,
    pub label: &'static str,
}

/// 渲染所需的全部数据，HTML 页面与 JSON 接口共用。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateView {
    pub template: TemplateVariant,
    pub title: &'static str,
    pub certificate_number: String,
    pub company_name: String,
    pub certificate_standard: String,
    pub derived_status: StatusBadge,
    pub operator_status: Option<OperatorStatusView>,
    pub sections: Vec<ViewSection>,
    pub verification_url: String,
}

impl CertificateView {
    pub fn field(&self, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    pub fn has_section(&self, heading: &str) -> bool {
        self.sections.iter().any(|s| s.heading == heading)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// 收集一个分区的字段，全部为空时整段省略。
struct SectionBuilder {
    heading: &'static str,
    fields: Vec<ViewField>,
}

impl SectionBuilder {
    fn new(heading: &'static str) -> Self {
        Self {
            heading,
            fields: Vec::new(),
        }
    }

    fn text(mut self, label: &'static str, value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() {
            self.fields.push(ViewField {
                label,
                value: value.to_string(),
            });
        }
        self
    }

    fn opt_text(self, label: &'static str, value: Option<&String>) -> Self {
        match value {
            Some(v) => self.text(label, v),
            None => self,
        }
    }

    fn date(mut self, label: &'static str, value: NaiveDate) -> Self {
        self.fields.push(ViewField {
            label,
            value: format_date(value),
        });
        self
    }

    fn opt_date(self, label: &'static str, value: Option<NaiveDate>) -> Self {
        match value {
            Some(v) => self.date(label, v),
            None => self,
        }
    }

    fn push_into(self, sections: &mut Vec<ViewSection>) {
        if !self.fields.is_empty() {
            sections.push(ViewSection {
                heading: self.heading,
                fields: self.fields,
            });
        }
    }
}

/// 选择版式并组装视图。
pub fn render(
    record: &certificates::Model,
    today: NaiveDate,
    verification_url: String,
) -> CertificateView {
    let template = TemplateVariant::dispatch(&record.template_type);
    let sections = match template {
        TemplateVariant::Americo => americo_sections(record),
        TemplateVariant::Siscert => siscert_sections(record),
        TemplateVariant::Equal => equal_sections(record),
        TemplateVariant::Gresolve => gresolve_sections(record),
    };

    let display = template.status_display();
    let derived_status = derive_status(record.expiry_date, today).badge();
    let operator_status = if display == StatusDisplay::Both {
        OperatorStatus::parse(&record.status).map(|status| OperatorStatusView {
            status,
            label: status.label(),
        })
    } else {
        None
    };

    CertificateView {
        template,
        title: template.title(),
        certificate_number: record.certificate_number.clone(),
        company_name: record.company_name.clone(),
        certificate_standard: record.certificate_standard.clone(),
        derived_status,
        operator_status,
        sections,
        verification_url,
    }
}

fn americo_sections(r: &certificates::Model) -> Vec<ViewSection> {
    let mut sections = Vec::new();
    SectionBuilder::new("Organization")
        .text("Company Name", &r.company_name)
        .opt_text("Address", r.address.as_ref())
        .opt_text("Scope", r.scope.as_ref())
        .push_into(&mut sections);
    SectionBuilder::new("Certificate")
        .text("Certificate Number", &r.certificate_number)
        .text("Standard", &r.certificate_standard)
        .date("Issue Date", r.issue_date)
        .date("Surveillance Date", r.surveillance_date)
        .date("Expiry Date", r.expiry_date)
        .push_into(&mut sections);
    SectionBuilder::new("Issued By")
        .text("Certification Body", &r.certification_body)
        .text("Accreditation Body", &r.accreditation_body)
        .push_into(&mut sections);
    sections
}

fn siscert_sections(r: &certificates::Model) -> Vec<ViewSection> {
    let mut sections = Vec::new();
    SectionBuilder::new("Organization")
        .text("Company Name", &r.company_name)
        .opt_text("Address", r.address.as_ref())
        .opt_text("Certified Location", r.certified_location.as_ref())
        .push_into(&mut sections);
    SectionBuilder::new("Scope of Certification")
        .opt_text("Scope", r.scope.as_ref())
        .opt_text("EA Code", r.ea_code.as_ref())
        .push_into(&mut sections);
    SectionBuilder::new("Certificate")
        .text("Certificate Number", &r.certificate_number)
        .text("Standard", &r.certificate_standard)
        .date("Issue Date", r.issue_date)
        .opt_date("First Issue Date", r.first_issue_date)
        .date("Surveillance Date", r.surveillance_date)
        .date("Expiry Date", r.expiry_date)
        .push_into(&mut sections);
    SectionBuilder::new("Issued By")
        .text("Certification Body", &r.certification_body)
        .text("Accreditation Body", &r.accreditation_body)
        .push_into(&mut sections);
    sections
}

fn equal_sections(r: &certificates::Model) -> Vec<ViewSection> {
    let mut sections = Vec::new();
    SectionBuilder::new("Organization")
        .text("Company Name", &r.company_name)
        .opt_text("Trading Name", r.trading_name.as_ref())
        .opt_text("Main Site Address", r.main_site_address.as_ref())
        .opt_text("Other Sites", r.other_sites.as_ref())
        .opt_text("Website", r.website.as_ref())
        .push_into(&mut sections);
    SectionBuilder::new("Management")
        .opt_text("Managing Partner", r.managing_partner.as_ref())
        .opt_text("Managing Practice", r.managing_practice.as_ref())
        .push_into(&mut sections);
    SectionBuilder::new("Approval")
        .text("Certificate Number", &r.certificate_number)
        .text("Standard", &r.certificate_standard)
        .opt_text("Certification Criteria", r.certification_criteria.as_ref())
        .opt_text("Scope", r.scope.as_ref())
        .opt_date("Original Audit Date", r.original_audit_date)
        .opt_date("Certification Approval Date", r.certification_approval_date)
        .date("Issue Date", r.issue_date)
        .date("Surveillance Date", r.surveillance_date)
        .date("Expiry Date", r.expiry_date)
        .opt_date(
            "Certification Expiration Date",
            r.certification_expiration_date,
        )
        .push_into(&mut sections);
    SectionBuilder::new("Issued By")
        .text("Certification Body", &r.certification_body)
        .text("Accreditation Body", &r.accreditation_body)
        .push_into(&mut sections);
    sections
}

fn gresolve_sections(r: &certificates::Model) -> Vec<ViewSection> {
    let mut sections = Vec::new();
    SectionBuilder::new("Organization")
        .text("Company Name", &r.company_name)
        .opt_text("Address", r.address.as_ref())
        .opt_text("Country", r.country.as_ref())
        .push_into(&mut sections);
    SectionBuilder::new("Scope of Certification")
        .opt_text("Scope", r.scope.as_ref())
        .opt_text("ISIC Code", r.isic_code.as_ref())
        .opt_text("EA Code", r.ea_code.as_ref())
        .push_into(&mut sections);
    SectionBuilder::new("Certificate")
        .text("Certificate Number", &r.certificate_number)
        .text("Standard", &r.certificate_standard)
        .opt_text("Issue", r.issue.as_ref())
        .opt_date("First Issue Date", r.first_issue_date)
        .opt_date("Latest Issue Date", r.latest_issue_date)
        .date("Issue Date", r.issue_date)
        .date("Surveillance Date", r.surveillance_date)
        .opt_date("Recertification Date", r.recertification_date)
        .date("Expiry Date", r.expiry_date)
        .push_into(&mut sections);
    SectionBuilder::new("Issued By")
        .text("Certification Body", &r.certification_body)
        .text("Accreditation Body", &r.accreditation_body)
        .push_into(&mut sections);
    sections
}
