//! 证书验证链接
//!
//! 二维码里编码的就是这里生成的 URL，公开的 `/verify` 路由接收同样的格式。

/// 公开验证页面路径
pub const VERIFY_PATH: &str = "/verify";

/// 证书编号所在的查询参数名
pub const CERT_QUERY_PARAM: &str = "cert";

/// `{base}/verify?cert={percent-encoded number}`
pub fn build_verification_url(base_url: &str, certificate_number: &str) -> String {
    format!(
        "{}{}?{}={}",
        base_url.trim_end_matches('/'),
        VERIFY_PATH,
        CERT_QUERY_PARAM,
        urlencoding::encode(certificate_number)
    )
}

/// 配置了公开域名时优先使用，否则退回当前请求的来源。
pub fn effective_base_url<'a>(configured: Option<&'a str>, request_origin: &'a str) -> &'a str {
    match configured {
        Some(base) if !base.trim().is_empty() => base,
        _ => request_origin,
    }
}

/// 由 Host 与协议拼出请求来源，例如 `https://certs.example.com`。
pub fn origin_from_parts(scheme: Option<&str>, host: &str) -> String {
    let scheme = match scheme.map(|s| s.trim().to_ascii_lowercase()) {
        Some(s) if s == "https" => "https",
        _ => "http",
    };
    format!("{}://{}", scheme, host.trim())
}
