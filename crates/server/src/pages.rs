//! 公开验证页面的 HTML 输出

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use certverify_common::status::BadgeStyle;
use certverify_common::templates::CertificateView;

const STYLE: &str = r#"
body{font-family:Georgia,serif;background:#f4f4f0;margin:0;padding:2rem;color:#222}
.sheet{max-width:860px;margin:0 auto;background:#fff;padding:2.5rem;border:1px solid #ddd}
.sheet h1{text-align:center;letter-spacing:.08em;text-transform:uppercase;font-size:1.6rem}
.company{text-align:center;font-size:1.4rem;font-weight:bold;margin:.5rem 0}
.standard{text-align:center;margin-bottom:1.5rem}
.badges{text-align:center;margin-bottom:1.5rem}
.badge{display:inline-block;padding:.25rem .75rem;border-radius:999px;margin:0 .25rem;font-family:sans-serif;font-size:.9rem}
.badge.positive{background:#e3f6e8;color:#17692f}
.badge.negative{background:#fde7e7;color:#a11d1d}
.badge.operator{background:#eef0f7;color:#303a68}
section h2{font-size:1rem;border-bottom:1px solid #ccc;padding-bottom:.25rem}
dl{display:grid;grid-template-columns:14rem 1fr;gap:.35rem 1rem}
dt{font-weight:bold}
.qr{text-align:center;margin-top:2rem}
.qr img{width:160px;height:160px}
.qr p{font-family:monospace;font-size:.8rem;word-break:break-all}
.template-siscert{border-top:8px solid #1b4f8c}
.template-equal{border-top:8px solid #7a5c12}
.template-gresolve{border-top:8px solid #2e7d4f}
.template-americo{border-top:8px solid #8c1b1b}
form{display:flex;gap:.5rem;justify-content:center;margin-top:1.5rem}
"#;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(title)
    )
}

/// 证书页面，二维码以 PNG data URL 内嵌。
pub fn certificate_page(view: &CertificateView, qr_png: &[u8]) -> String {
    let mut body = format!(
        "<main class=\"sheet template-{}\">\n<h1>{}</h1>\n<p class=\"company\">{}</p>\n\
         <p class=\"standard\">{}</p>\n\
         <p class=\"number\">Certificate No. <strong>{}</strong></p>\n",
        view.template.as_str(),
        escape_html(view.title),
        escape_html(&view.company_name),
        escape_html(&view.certificate_standard),
        escape_html(&view.certificate_number),
    );

    let badge = &view.derived_status;
    let style = match badge.style {
        BadgeStyle::Positive => "positive",
        BadgeStyle::Negative => "negative",
    };
    body.push_str(&format!(
        "<div class=\"badges\"><span class=\"badge {style}\" data-status=\"{}\">{}</span>",
        badge.status.as_str(),
        badge.label
    ));
    if let Some(operator) = &view.operator_status {
        body.push_str(&format!(
            "<span class=\"badge operator\" data-operator-status=\"{}\">{}</span>",
            operator.status.as_str(),
            operator.label
        ));
    }
    body.push_str("</div>\n");

    for section in &view.sections {
        let fields: String = section
            .fields
            .iter()
            .map(|field| {
                format!(
                    "<dt>{}</dt><dd>{}</dd>\n",
                    escape_html(field.label),
                    escape_html(&field.value)
                )
            })
            .collect();
        body.push_str(&format!(
            "<section>\n<h2>{}</h2>\n<dl>\n{fields}</dl>\n</section>\n",
            escape_html(section.heading)
        ));
    }

    body.push_str(&format!(
        "<div class=\"qr\"><img alt=\"Verification QR code\" src=\"data:image/png;base64,{}\">\
         <p>{}</p></div>\n</main>",
        STANDARD.encode(qr_png),
        escape_html(&view.verification_url),
    ));

    layout(&format!("{} - {}", view.certificate_number, view.company_name), &body)
}

/// 未找到、输入错误或故障时的提示页，附带一个按编号查询的表单。
pub fn message_page(title: &str, message: &str) -> String {
    let body = format!(
        "<main class=\"sheet\">\n<h1>{}</h1>\n<p class=\"standard\">{}</p>\n\
         <form method=\"get\" action=\"/verify\">\
         <input name=\"cert\" placeholder=\"Certificate number\" required>\
         <button type=\"submit\">Verify</button></form>\n</main>",
        escape_html(title),
        escape_html(message)
    );
    layout(title, &body)
}
