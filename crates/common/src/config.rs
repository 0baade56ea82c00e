use anyhow::{Result, anyhow};
use chrono::FixedOffset;
use std::env;
use std::path::PathBuf;
use uuid::Uuid;

/// 二维码画布边长下限（像素）
pub const MIN_QR_SIZE_PX: u32 = 512;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: String,
    pub public_base_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub admin_bootstrap_user_id: Option<Uuid>,
    pub static_dir: PathBuf,
    pub status_utc_offset: FixedOffset,
    pub qr_size_px: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env early so process env reads pick it up.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL is required"))?;
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET is required"))?;

        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let public_base_url = parse_base_url(lookup("PUBLIC_BASE_URL"))?;
        let jwt_audience = match lookup("JWT_AUDIENCE") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(v.trim().to_string()),
            None => Some("authenticated".to_string()),
        };

        let admin_bootstrap_user_id = match lookup("ADMIN_BOOTSTRAP_USER_ID") {
            Some(raw) if !raw.trim().is_empty() => Some(
                Uuid::parse_str(raw.trim())
                    .map_err(|_| anyhow!("ADMIN_BOOTSTRAP_USER_ID must be a UUID"))?,
            ),
            _ => None,
        };

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("web/dist"));

        let status_utc_offset = match lookup("STATUS_UTC_OFFSET") {
            Some(raw) => raw
                .trim()
                .parse::<FixedOffset>()
                .map_err(|_| anyhow!("STATUS_UTC_OFFSET must look like +07:00"))?,
            None => FixedOffset::east_opt(0).ok_or_else(|| anyhow!("invalid UTC offset"))?,
        };

        let qr_size_px = env_u32(&lookup, "QR_SIZE_PX", MIN_QR_SIZE_PX).max(MIN_QR_SIZE_PX);

        Ok(Self {
            database_url,
            listen_addr,
            public_base_url,
            jwt_secret,
            jwt_audience,
            admin_bootstrap_user_id,
            static_dir,
            status_utc_offset,
            qr_size_px,
        })
    }
}

fn env_u32<F>(lookup: &F, key: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_base_url(raw: Option<String>) -> Result<Option<String>> {
    let raw = match raw {
        Some(v) => v.trim().trim_end_matches('/').to_string(),
        None => return Ok(None),
    };
    if raw.is_empty() {
        return Ok(None);
    }
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(anyhow!("PUBLIC_BASE_URL must start with http:// or https://"));
    }
    Ok(Some(raw))
}
