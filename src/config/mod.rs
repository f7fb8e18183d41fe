use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub supabase: SupabaseConfig,
    pub uploads: UploadConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub storage_bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_file_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// When true, the resource routes require a Bearer token resolved
    /// through the auth provider. The auth routes themselves stay public.
    pub auth_required: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment-keyed defaults, then specific env vars on top
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }

        if let Ok(v) = env::var("SUPABASE_URL") {
            self.supabase.url = v;
        }
        if let Ok(v) = env::var("SUPABASE_API_KEY") {
            self.supabase.anon_key = v;
        }
        if let Ok(v) = env::var("SUPABASE_STORAGE_BUCKET") {
            self.supabase.storage_bucket = v;
        }

        if let Ok(v) = env::var("UPLOAD_MAX_FILE_SIZE_BYTES") {
            self.uploads.max_file_size_bytes = v.parse().unwrap_or(self.uploads.max_file_size_bytes);
        }

        if let Ok(v) = env::var("AUTH_REQUIRED") {
            self.security.auth_required = v.parse().unwrap_or(self.security.auth_required);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            supabase: SupabaseConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
                storage_bucket: "property-manager".to_string(),
            },
            uploads: UploadConfig {
                max_file_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig { auth_required: false },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                max_request_size_bytes: 10 * 1024 * 1024,
            },
            supabase: SupabaseConfig {
                url: String::new(),
                anon_key: String::new(),
                storage_bucket: "property-manager".to_string(),
            },
            uploads: UploadConfig {
                max_file_size_bytes: 5 * 1024 * 1024,
            },
            security: SecurityConfig { auth_required: false },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                max_request_size_bytes: 10 * 1024 * 1024,
            },
            supabase: SupabaseConfig {
                url: String::new(),
                anon_key: String::new(),
                storage_bucket: "property-manager".to_string(),
            },
            uploads: UploadConfig {
                max_file_size_bytes: 5 * 1024 * 1024,
            },
            security: SecurityConfig { auth_required: false },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
