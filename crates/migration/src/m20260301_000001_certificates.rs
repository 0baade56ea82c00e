use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Certificates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Certificates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Certificates::CertificateNumber).text().not_null())
                    .col(ColumnDef::new(Certificates::CompanyName).text().not_null())
                    .col(ColumnDef::new(Certificates::CertificateStandard).text().not_null())
                    .col(
                        ColumnDef::new(Certificates::CertificationBody)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Certificates::AccreditationBody)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Certificates::IssueDate).date().not_null())
                    .col(ColumnDef::new(Certificates::SurveillanceDate).date().not_null())
                    .col(ColumnDef::new(Certificates::ExpiryDate).date().not_null())
                    .col(ColumnDef::new(Certificates::FirstIssueDate).date().null())
                    .col(ColumnDef::new(Certificates::LatestIssueDate).date().null())
                    .col(ColumnDef::new(Certificates::RecertificationDate).date().null())
                    .col(
                        ColumnDef::new(Certificates::CertificationApprovalDate)
                            .date()
                            .null(),
                    )
                    .col(ColumnDef::new(Certificates::OriginalAuditDate).date().null())
                    .col(
                        ColumnDef::new(Certificates::CertificationExpirationDate)
                            .date()
                            .null(),
                    )
                    .col(ColumnDef::new(Certificates::EaCode).text().null())
                    .col(ColumnDef::new(Certificates::IsicCode).text().null())
                    .col(ColumnDef::new(Certificates::CertificationCriteria).text().null())
                    .col(ColumnDef::new(Certificates::Address).text().null())
                    .col(ColumnDef::new(Certificates::CertifiedLocation).text().null())
                    .col(ColumnDef::new(Certificates::Country).text().null())
                    .col(ColumnDef::new(Certificates::Issue).text().null())
                    .col(ColumnDef::new(Certificates::Scope).text().null())
                    .col(ColumnDef::new(Certificates::TradingName).text().null())
                    .col(ColumnDef::new(Certificates::MainSiteAddress).text().null())
                    .col(ColumnDef::new(Certificates::OtherSites).text().null())
                    .col(ColumnDef::new(Certificates::Website).text().null())
                    .col(ColumnDef::new(Certificates::ManagingPartner).text().null())
                    .col(ColumnDef::new(Certificates::ManagingPractice).text().null())
                    .col(
                        ColumnDef::new(Certificates::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Certificates::TemplateType)
                            .string()
                            .not_null()
                            .default("americo"),
                    )
                    .col(ColumnDef::new(Certificates::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(Certificates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Certificates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // certificate_number 不做唯一约束，查询时按创建时间取最新一条
        manager
            .create_index(
                Index::create()
                    .name("certificates_number_idx")
                    .table(Certificates::Table)
                    .col(Certificates::CertificateNumber)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("certificates_created_at_idx")
                    .table(Certificates::Table)
                    .col(Certificates::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Certificates::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Certificates {
    Table,
    Id,
    CertificateNumber,
    CompanyName,
    CertificateStandard,
    CertificationBody,
    AccreditationBody,
    IssueDate,
    SurveillanceDate,
    ExpiryDate,
    FirstIssueDate,
    LatestIssueDate,
    RecertificationDate,
    CertificationApprovalDate,
    OriginalAuditDate,
    CertificationExpirationDate,
    EaCode,
    IsicCode,
    CertificationCriteria,
    Address,
    CertifiedLocation,
    Country,
    Issue,
    Scope,
    TradingName,
    MainSiteAddress,
    OtherSites,
    Website,
    ManagingPartner,
    ManagingPractice,
    Status,
    TemplateType,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
