use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "certificates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub certificate_number: String,
    pub company_name: String,
    pub certificate_standard: String,
    pub certification_body: String,
    pub accreditation_body: String,
    pub issue_date: Date,
    pub surveillance_date: Date,
    pub expiry_date: Date,
    pub first_issue_date: Option<Date>,
    pub latest_issue_date: Option<Date>,
    pub recertification_date: Option<Date>,
    pub certification_approval_date: Option<Date>,
    pub original_audit_date: Option<Date>,
    pub certification_expiration_date: Option<Date>,
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
    pub status: String,
    pub template_type: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        unreachable!("certificates has no relations")
    }
}

impl ActiveModelBehavior for ActiveModel {}
