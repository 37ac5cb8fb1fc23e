// config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Signed-URL generation for the object store
    pub storage_base_url: String,
    pub storage_signing_key: String,
    pub storage_url_ttl_secs: i64,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");
        let app_url = std::env::var("APP_URL").expect("APP_URL must be set");

        let storage_base_url = std::env::var("STORAGE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000/files".to_string());
        let storage_signing_key = std::env::var("STORAGE_SIGNING_KEY")
            .expect("STORAGE_SIGNING_KEY must be set");
        let storage_url_ttl_secs = std::env::var("STORAGE_URL_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string());

        Config {
            database_url,
            app_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port: 8000,
            storage_base_url,
            storage_signing_key,
            storage_url_ttl_secs: storage_url_ttl_secs.parse::<i64>().unwrap(),
        }
    }
}
