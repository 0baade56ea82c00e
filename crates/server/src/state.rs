use crate::auth::JwtVerifier;
use crate::store::CertificateStore;
use certverify_common::AppConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CertificateStore>,
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn CertificateStore>, config: AppConfig) -> Self {
        let jwt = JwtVerifier::new(&config.jwt_secret, config.jwt_audience.as_deref());
        Self {
            store,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        }
    }
}
