//! 测试用的内存存储

use crate::store::{AuditLogModel, CertificateFilter, CertificateModel, CertificateStore};
use async_trait::async_trait;
use certverify_common::models::Role;
use certverify_common::{CertError, CertResult, CertificateFields};
use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use sea_orm::DbErr;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<CertificateModel>>,
    audit: Mutex<Vec<AuditLogModel>>,
    roles: Mutex<HashSet<(Uuid, &'static str)>>,
    queries: AtomicUsize,
    failing: bool,
}

impl MemoryStore {
    pub fn with_records(records: Vec<CertificateModel>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    /// 所有操作都返回持久层错误。
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    /// 公开查询接口被调用的次数
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn audit_entries(&self) -> Vec<AuditLogModel> {
        self.audit.lock().unwrap().clone()
    }

    fn check(&self) -> CertResult<()> {
        if self.failing {
            return Err(CertError::Persistence(DbErr::Custom(
                "connection refused".to_string(),
            )));
        }
        Ok(())
    }

    fn push_audit(&self, actor: Uuid, action: &str, id: Uuid, diff: serde_json::Value) {
        self.audit.lock().unwrap().push(AuditLogModel {
            id: Uuid::new_v4(),
            actor: actor.to_string(),
            action: action.to_string(),
            certificate_id: Some(id),
            diff,
            created_at: Utc::now().fixed_offset(),
        });
    }
}

#[async_trait]
impl CertificateStore for MemoryStore {
    async fn find_by_number(&self, certificate_number: &str) -> CertResult<Vec<CertificateModel>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.certificate_number == certificate_number)
            .cloned()
            .collect())
    }

    async fn find_by_number_and_prefix(
        &self,
        certificate_number: &str,
        company_prefix: &str,
    ) -> CertResult<Vec<CertificateModel>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let prefix = company_prefix.to_lowercase();
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.certificate_number == certificate_number)
            .filter(|r| r.company_name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn list(&self, filter: &CertificateFilter) -> CertResult<Vec<CertificateModel>> {
        self.check()?;
        let q = filter
            .q
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        let records = self.records.lock().unwrap();
        let mut list: Vec<CertificateModel> = records
            .iter()
            .filter(|r| match &q {
                Some(q) => {
                    r.company_name.to_lowercase().contains(q)
                        || r.certificate_number.to_lowercase().contains(q)
                }
                None => true,
            })
            .filter(|r| {
                filter
                    .template_type
                    .is_none_or(|t| r.template_type == t.as_str())
            })
            .filter(|r| filter.status.is_none_or(|s| r.status == s.as_str()))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn get(&self, id: Uuid) -> CertResult<Option<CertificateModel>> {
        self.check()?;
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, actor: Uuid, fields: CertificateFields) -> CertResult<CertificateModel> {
        self.check()?;
        let mut model = sample_record("", "");
        model.created_by = Some(actor);
        model.created_at = Utc::now().fixed_offset();
        model.updated_at = model.created_at;
        fields.merge_into(&mut model);
        self.records.lock().unwrap().push(model.clone());
        self.push_audit(actor, "certificate.create", model.id, json!({"after": model}));
        Ok(model)
    }

    async fn update(
        &self,
        actor: Uuid,
        id: Uuid,
        fields: CertificateFields,
    ) -> CertResult<Option<CertificateModel>> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let Some(current) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        let before = current.clone();
        fields.merge_into(current);
        current.updated_at = Utc::now().fixed_offset();
        let updated = current.clone();
        drop(records);
        self.push_audit(
            actor,
            "certificate.update",
            id,
            json!({"before": before, "after": updated}),
        );
        Ok(Some(updated))
    }

    async fn delete(&self, actor: Uuid, id: Uuid) -> CertResult<bool> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let Some(pos) = records.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        let removed = records.remove(pos);
        drop(records);
        self.push_audit(actor, "certificate.delete", id, json!({"before": removed}));
        Ok(true)
    }

    async fn has_role(&self, user_id: Uuid, role: Role) -> CertResult<bool> {
        self.check()?;
        Ok(self.roles.lock().unwrap().contains(&(user_id, role.as_str())))
    }

    async fn grant_role(&self, user_id: Uuid, role: Role) -> CertResult<()> {
        self.check()?;
        self.roles.lock().unwrap().insert((user_id, role.as_str()));
        Ok(())
    }

    async fn list_audit(&self, limit: u64) -> CertResult<Vec<AuditLogModel>> {
        self.check()?;
        let audit = self.audit.lock().unwrap();
        Ok(audit.iter().rev().take(limit as usize).cloned().collect())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// 一条 americo 模板、到期日 2026-01-01 的记录。
pub fn sample_record(number: &str, company: &str) -> CertificateModel {
    let created = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .unwrap();
    CertificateModel {
        id: Uuid::new_v4(),
        certificate_number: number.to_string(),
        company_name: company.to_string(),
        certificate_standard: "ISO 9001:2015".to_string(),
        certification_body: "SIS Certifications".to_string(),
        accreditation_body: "UAF".to_string(),
        issue_date: date("2023-01-01"),
        surveillance_date: date("2024-01-01"),
        expiry_date: date("2026-01-01"),
        first_issue_date: None,
        latest_issue_date: None,
        recertification_date: None,
        certification_approval_date: None,
        original_audit_date: None,
        certification_expiration_date: None,
        ea_code: None,
        isic_code: None,
        certification_criteria: None,
        address: None,
        certified_location: None,
        country: None,
        issue: None,
        scope: None,
        trading_name: None,
        main_site_address: None,
        other_sites: None,
        website: None,
        managing_partner: None,
        managing_practice: None,
        status: "active".to_string(),
        template_type: "americo".to_string(),
        created_by: None,
        created_at: created,
        updated_at: created,
    }
}
