//! 验证链接二维码
//!
//! 高纠错等级，带静区，画布不小于配置的边长，适合打印在证书上扫描。

use certverify_common::{CertError, CertResult};
use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// 把验证链接编码成 PNG。同一链接重复生成可解码出相同内容。
pub fn encode_png(url: &str, min_size_px: u32) -> CertResult<Vec<u8>> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H)
        .map_err(|e| CertError::qr_code(e.to_string()))?;
    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(min_size_px, min_size_px)
        .quiet_zone(true)
        .build();

    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| CertError::qr_code(e.to_string()))?;
    Ok(buffer)
}
