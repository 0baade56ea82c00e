//! 证书持久层
//!
//! 路由与查询逻辑只依赖 `CertificateStore`，数据库实现基于 SeaORM。

use async_trait::async_trait;
use certverify_common::entities::{audit_logs, certificates, user_roles};
use certverify_common::models::{OperatorStatus, Role, TemplateType};
use certverify_common::{CertResult, CertificateFields};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

pub type CertificateModel = certificates::Model;
pub type AuditLogModel = audit_logs::Model;

/// 管理后台列表筛选条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateFilter {
    /// 公司名或证书编号包含该文本（不区分大小写）
    pub q: Option<String>,
    pub template_type: Option<TemplateType>,
    pub status: Option<OperatorStatus>,
}

#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// 证书编号精确匹配（区分大小写），返回所有命中行。
    async fn find_by_number(&self, certificate_number: &str) -> CertResult<Vec<CertificateModel>>;

    /// 证书编号精确匹配且公司名以 `company_prefix` 开头（不区分大小写）。
    async fn find_by_number_and_prefix(
        &self,
        certificate_number: &str,
        company_prefix: &str,
    ) -> CertResult<Vec<CertificateModel>>;

    async fn list(&self, filter: &CertificateFilter) -> CertResult<Vec<CertificateModel>>;

    async fn get(&self, id: Uuid) -> CertResult<Option<CertificateModel>>;

    async fn insert(&self, actor: Uuid, fields: CertificateFields) -> CertResult<CertificateModel>;

    async fn update(
        &self,
        actor: Uuid,
        id: Uuid,
        fields: CertificateFields,
    ) -> CertResult<Option<CertificateModel>>;

    async fn delete(&self, actor: Uuid, id: Uuid) -> CertResult<bool>;

    async fn has_role(&self, user_id: Uuid, role: Role) -> CertResult<bool>;

    /// 幂等：已拥有该角色时不做任何事。
    async fn grant_role(&self, user_id: Uuid, role: Role) -> CertResult<()>;

    async fn list_audit(&self, limit: u64) -> CertResult<Vec<AuditLogModel>>;
}

/// 转义 LIKE 通配符，配合 `ESCAPE '\'` 使用。
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn lower_like(column: certificates::Column, pattern: String) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn prefix_query(certificate_number: &str, company_prefix: &str) -> Select<certificates::Entity> {
    let pattern = format!("{}%", escape_like(&company_prefix.to_lowercase()));
    certificates::Entity::find()
        .filter(certificates::Column::CertificateNumber.eq(certificate_number))
        .filter(lower_like(certificates::Column::CompanyName, pattern))
        .order_by_desc(certificates::Column::CreatedAt)
        .order_by_desc(certificates::Column::Id)
}

fn list_query(filter: &CertificateFilter) -> Select<certificates::Entity> {
    let mut query = certificates::Entity::find().order_by_desc(certificates::Column::CreatedAt);
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", escape_like(&q.to_lowercase()));
        query = query.filter(
            Condition::any()
                .add(lower_like(certificates::Column::CompanyName, pattern.clone()))
                .add(lower_like(certificates::Column::CertificateNumber, pattern)),
        );
    }
    if let Some(template_type) = filter.template_type {
        query = query.filter(certificates::Column::TemplateType.eq(template_type.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(certificates::Column::Status.eq(status.as_str()));
    }
    query
}

#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CertificateStore for SeaOrmStore {
    async fn find_by_number(&self, certificate_number: &str) -> CertResult<Vec<CertificateModel>> {
        let rows = certificates::Entity::find()
            .filter(certificates::Column::CertificateNumber.eq(certificate_number))
            .order_by_desc(certificates::Column::CreatedAt)
            .order_by_desc(certificates::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn find_by_number_and_prefix(
        &self,
        certificate_number: &str,
        company_prefix: &str,
    ) -> CertResult<Vec<CertificateModel>> {
        let rows = prefix_query(certificate_number, company_prefix)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn list(&self, filter: &CertificateFilter) -> CertResult<Vec<CertificateModel>> {
        let mut query = certificates::Entity::find().order_by_desc(certificates::Column::CreatedAt);
        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", escape_like(&q.to_lowercase()));
            query = query.filter(
                Condition::any()
                    .add(lower_like(certificates::Column::CompanyName, pattern.clone()))
                    .add(lower_like(certificates::Column::CertificateNumber, pattern)),
            );
        }
        if let Some(template_type) = filter.template_type {
            query = query.filter(certificates::Column::TemplateType.eq(template_type.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(certificates::Column::Status.eq(status.as_str()));
        }
        Ok(query.all(&self.db).await?)
    }

    async fn get(&self, id: Uuid) -> CertResult<Option<CertificateModel>> {
        Ok(certificates::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn insert(&self, actor: Uuid, fields: CertificateFields) -> CertResult<CertificateModel> {
        let model = crate::txn!(&self.db, |txn| {
            let id = Uuid::new_v4();
            let mut active = certificates::ActiveModel {
                id: Set(id),
                created_by: Set(Some(actor)),
                ..Default::default()
            };
            fields.apply_to(&mut active);
            let model = active.insert(txn).await?;
            add_audit(txn, actor, "certificate.create", Some(id), json!({"after": model})).await?;
            Ok::<_, certverify_common::CertError>(model)
        })?;
        Ok(model)
    }

    async fn update(
        &self,
        actor: Uuid,
        id: Uuid,
        fields: CertificateFields,
    ) -> CertResult<Option<CertificateModel>> {
        let updated = crate::txn!(&self.db, |txn| {
            let Some(current) = certificates::Entity::find_by_id(id).one(txn).await? else {
                return Ok(None);
            };
            let before = current.clone();
            let mut active: certificates::ActiveModel = current.into();
            fields.apply_to(&mut active);
            active.updated_at = Set(Utc::now().into());
            let updated = active.update(txn).await?;
            add_audit(
                txn,
                actor,
                "certificate.update",
                Some(id),
                json!({"before": before, "after": updated}),
            )
            .await?;
            Ok::<_, certverify_common::CertError>(Some(updated))
        })?;
        Ok(updated)
    }

    async fn delete(&self, actor: Uuid, id: Uuid) -> CertResult<bool> {
        let deleted = crate::txn!(&self.db, |txn| {
            let Some(current) = certificates::Entity::find_by_id(id).one(txn).await? else {
                return Ok(false);
            };
            certificates::Entity::delete_by_id(id).exec(txn).await?;
            add_audit(txn, actor, "certificate.delete", Some(id), json!({"before": current}))
                .await?;
            Ok::<_, certverify_common::CertError>(true)
        })?;
        Ok(deleted)
    }

    async fn has_role(&self, user_id: Uuid, role: Role) -> CertResult<bool> {
        let found = user_roles::Entity::find()
            .filter(user_roles::Column::UserId.eq(user_id))
            .filter(user_roles::Column::Role.eq(role.as_str()))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    async fn grant_role(&self, user_id: Uuid, role: Role) -> CertResult<()> {
        let active = user_roles::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            role: Set(role.as_str().to_string()),
            ..Default::default()
        };
        user_roles::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([user_roles::Column::UserId, user_roles::Column::Role])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn list_audit(&self, limit: u64) -> CertResult<Vec<AuditLogModel>> {
        let list = audit_logs::Entity::find()
            .order_by_desc(audit_logs::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(list)
    }
}

async fn add_audit<C: ConnectionTrait>(
    db: &C,
    actor: Uuid,
    action: &str,
    certificate_id: Option<Uuid>,
    diff: JsonValue,
) -> Result<(), sea_orm::DbErr> {
    let active = audit_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        actor: Set(actor.to_string()),
        action: Set(action.to_string()),
        certificate_id: Set(certificate_id),
        diff: Set(diff),
        ..Default::default()
    };
    if let Err(err) = active.insert(db).await {
        crate::metrics::inc_audit_write_failure();
        return Err(err);
    }
    Ok(())
}
