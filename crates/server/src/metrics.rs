//! Prometheus 指标
//!
//! 全部指标在首次使用时注册到默认 registry，注册失败只记日志，不影响请求。

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, TextEncoder,
    register_histogram_vec, register_int_counter, register_int_counter_vec,
};
use std::sync::OnceLock;
use std::time::Instant;

const METRIC_PREFIX: &str = "certverify";

struct ServiceMetrics {
    http_requests: IntCounterVec,
    http_duration: HistogramVec,
    lookups: IntCounterVec,
    audit_write_failures: IntCounter,
}

impl ServiceMetrics {
    fn register() -> Result<Self, prometheus::Error> {
        let http_requests = register_int_counter_vec!(
            Opts::new(format!("{METRIC_PREFIX}_http_requests_total"), "HTTP 请求总数"),
            &["method", "path", "status"]
        )?;
        let http_duration = register_histogram_vec!(
            HistogramOpts::new(
                format!("{METRIC_PREFIX}_http_request_duration_seconds"),
                "HTTP 请求耗时（秒）",
            ),
            &["method", "path"]
        )?;
        let lookups = register_int_counter_vec!(
            Opts::new(
                format!("{METRIC_PREFIX}_lookups_total"),
                "证书查询次数，按查询方式与结果分类"
            ),
            &["mode", "outcome"]
        )?;
        let audit_write_failures = register_int_counter!(
            format!("{METRIC_PREFIX}_audit_write_failures_total"),
            "审计写入失败次数"
        )?;
        Ok(Self {
            http_requests,
            http_duration,
            lookups,
            audit_write_failures,
        })
    }
}

fn service_metrics() -> Option<&'static ServiceMetrics> {
    static METRICS: OnceLock<Result<ServiceMetrics, prometheus::Error>> = OnceLock::new();
    match METRICS.get_or_init(ServiceMetrics::register) {
        Ok(metrics) => Some(metrics),
        Err(err) => {
            tracing::warn!(error = %err, "metrics registration failed");
            None
        }
    }
}

/// `mode`: direct / assisted；`outcome`: found / not_found / invalid / error
pub fn inc_lookup(mode: &str, outcome: &str) {
    if let Some(m) = service_metrics() {
        m.lookups.with_label_values(&[mode, outcome]).inc();
    }
}

pub fn inc_audit_write_failure() {
    if let Some(m) = service_metrics() {
        m.audit_write_failures.inc();
    }
}

/// 只挂在已匹配的路由上，`path` 标签取路由模板，不含证书编号。
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "<unmatched>".to_string(), |p| p.as_str().to_string());

    let started = Instant::now();
    let response = next.run(req).await;

    if let Some(m) = service_metrics() {
        let status = response.status();
        m.http_requests
            .with_label_values(&[method.as_str(), route.as_str(), status.as_str()])
            .inc();
        m.http_duration
            .with_label_values(&[method.as_str(), route.as_str()])
            .observe(started.elapsed().as_secs_f64());
    }
    response
}

pub fn render_metrics() -> Response {
    let encoder = TextEncoder::new();
    let mut body = Vec::new();
    if let Err(err) = encoder.encode(&prometheus::gather(), &mut body) {
        tracing::error!(error = %err, "failed to encode metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response();
    }
    let content_type = HeaderValue::from_str(encoder.format_type())
        .unwrap_or_else(|_| HeaderValue::from_static("text/plain; version=0.0.4"));
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}
