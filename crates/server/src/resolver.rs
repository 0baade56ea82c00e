//! 证书查询
//!
//! 两种入口：二维码深链接只带证书编号（直接查询）；公开表单同时要求
//! 公司名前缀与证书编号（辅助查询）。命中多行时取最近创建的一行。
//! “未找到”是正常结果，用 `None` 表示；只有输入非法或持久层故障才返回错误。

use crate::metrics;
use crate::store::{CertificateModel, CertificateStore};
use certverify_common::CertResult;
use certverify_common::validation::{AssistedLookup, normalize_certificate_number};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    Direct,
    Assisted,
}

impl LookupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Assisted => "assisted",
        }
    }
}

/// 只按证书编号精确匹配。
pub async fn resolve_direct(
    store: &dyn CertificateStore,
    certificate_number: &str,
) -> CertResult<Option<CertificateModel>> {
    let outcome = async {
        let number = normalize_certificate_number(certificate_number)?;
        let candidates = store.find_by_number(&number).await?;
        Ok(pick_most_recent(&number, candidates))
    }
    .await;
    record(LookupMode::Direct, &outcome);
    outcome
}

/// 公司名前缀（不区分大小写）与证书编号（精确）必须命中同一行。
/// 输入校验在查询之前完成。
pub async fn resolve_assisted(
    store: &dyn CertificateStore,
    company_prefix: &str,
    certificate_number: &str,
) -> CertResult<Option<CertificateModel>> {
    let outcome = async {
        let lookup = AssistedLookup::new(company_prefix, certificate_number)?;
        let candidates = store
            .find_by_number_and_prefix(&lookup.certificate_number, &lookup.company_prefix)
            .await?;
        Ok(pick_most_recent(&lookup.certificate_number, candidates))
    }
    .await;
    record(LookupMode::Assisted, &outcome);
    outcome
}

/// 最新 `created_at` 优先，相同时取较大的 id，结果与存储返回顺序无关。
fn pick_most_recent(
    certificate_number: &str,
    candidates: Vec<CertificateModel>,
) -> Option<CertificateModel> {
    if candidates.len() > 1 {
        warn!(
            certificate_number = %certificate_number,
            matches = candidates.len(),
            "duplicate certificate number, using most recently created record"
        );
    }
    candidates
        .into_iter()
        .max_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)))
}

fn record(mode: LookupMode, outcome: &CertResult<Option<CertificateModel>>) {
    let label = match outcome {
        Ok(Some(_)) => "found",
        Ok(None) => "not_found",
        Err(err) if err.is_client_error() => "invalid",
        Err(_) => "error",
    };
    metrics::inc_lookup(mode.as_str(), label);
}
