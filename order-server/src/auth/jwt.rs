//! JWT 令牌服务
//!
//! 校验外部认证服务签发的客户令牌并解析身份信息。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节，与认证服务共享)
    pub secret: String,
    /// 令牌过期时间 (分钟)，仅用于本地签发的测试令牌
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl JwtConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => {
                if secret.len() < 32 {
                    tracing::warn!("JWT_SECRET is shorter than 32 bytes");
                }
                secret
            }
            Err(_) => {
                tracing::warn!("⚠️  JWT_SECRET not set! Using development-only default key.");
                "storefront-development-only-secret-key-2025".to_string()
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "storefront-auth".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "storefront-api".to_string()),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 客户 ID (Subject)
    pub sub: String,
    /// 客户邮箱
    pub email: String,
    /// 显示名称
    pub name: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用指定配置创建新的 JWT 服务
    pub fn new(config: &JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config: config.clone(),
            encoding_key,
            decoding_key,
        }
    }

    /// 签发客户令牌
    ///
    /// 生产环境令牌由外部认证服务签发；本方法服务于测试和本地工具。
    pub fn generate_token(
        &self,
        customer_id: &str,
        email: &str,
        name: &str,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: customer_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// 当前客户上下文 (从 JWT Claims 解析)
///
/// 由提取器创建，注入到请求处理函数。每个组件调用都显式携带客户身份，
/// 所有数据访问以 (customer_id, resource) 为键，杜绝跨客户读写。
///
/// # 示例
///
/// ```ignore
/// async fn handler(customer: CurrentCustomer) -> Json<()> {
///     println!("客户: {} <{}>", customer.display_name, customer.email);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentCustomer {
    /// 客户 ID
    pub id: String,
    /// 邮箱
    pub email: String,
    /// 显示名称
    pub display_name: String,
}

impl From<Claims> for CurrentCustomer {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            display_name: claims.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "unit-test-secret-key-with-enough-length".to_string(),
            expiration_minutes: 5,
            issuer: "storefront-auth".to_string(),
            audience: "storefront-api".to_string(),
        })
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = test_service();

        let token = service
            .generate_token("cust-123", "jo@example.com", "Jo Doe")
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "cust-123");
        assert_eq!(claims.email, "jo@example.com");
        assert_eq!(claims.name, "Jo Doe");
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = test_service();
        let token = service
            .generate_token("cust-123", "jo@example.com", "Jo Doe")
            .expect("Failed to generate test token");

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }

    #[test]
    fn test_current_customer_from_claims() {
        let service = test_service();
        let token = service
            .generate_token("cust-9", "a@b.c", "Ann")
            .expect("Failed to generate test token");
        let claims = service.validate_token(&token).unwrap();

        let customer = CurrentCustomer::from(claims);
        assert_eq!(customer.id, "cust-9");
        assert_eq!(customer.display_name, "Ann");
    }
}
