//! JWT 토큰 처리.
//!
//! Access Token 생성/검증 로직.
//!
//! 페이로드는 subject(사용자 email)와 만료 시간 두 클레임만 담습니다.
//! 만료 판정에 쓰는 현재 시각은 호출자가 주입하므로 시간 경계 테스트가
//! 시스템 시계와 무관하게 가능합니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use todo_core::AuthConfig;

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

/// JWT 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(jsonwebtoken::errors::Error),
    #[error("지원하지 않는 서명 알고리즘: {0}")]
    UnsupportedAlgorithm(String),
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("subject 클레임이 없습니다")]
    MissingSubject,
    #[error("잘못된 토큰")]
    Invalid,
}

/// 설정 문자열을 서명 알고리즘으로 변환.
fn signing_algorithm(config: &AuthConfig) -> Result<Algorithm, TokenError> {
    config
        .algorithm
        .parse::<Algorithm>()
        .map_err(|_| TokenError::UnsupportedAlgorithm(config.algorithm.clone()))
}

/// Access Token 생성.
///
/// 만료 시간은 `now + config.access_token_expire_minutes`로 계산됩니다.
///
/// # Arguments
///
/// * `subject` - 토큰 주체 (사용자 email)
/// * `now` - 발급 기준 시각
/// * `config` - 시크릿/알고리즘/만료 설정
///
/// # Returns
///
/// 인코딩된 JWT 문자열
pub fn create_access_token(
    subject: &str,
    now: DateTime<Utc>,
    config: &AuthConfig,
) -> Result<String, TokenError> {
    let algorithm = signing_algorithm(config)?;
    let expire_at = now + Duration::minutes(config.access_token_expire_minutes);

    let claims = Claims {
        sub: Some(subject.to_string()),
        exp: expire_at.timestamp(),
    };

    encode(
        &Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(config.secret_key.expose_secret().as_bytes()),
    )
    .map_err(TokenError::Encoding)
}

/// JWT 토큰 디코딩 및 검증.
///
/// 서명과 알고리즘을 검증한 뒤 만료 시간을 `now`와 비교합니다.
/// `exp <= now`이면 만료로 처리합니다 (만료 시각 정각 포함).
///
/// # Arguments
///
/// * `token` - JWT 토큰 문자열
/// * `now` - 만료 판정 기준 시각
/// * `config` - 시크릿/알고리즘 설정
///
/// # Returns
///
/// 토큰의 subject (사용자 email)
pub fn decode_access_token(
    token: &str,
    now: DateTime<Utc>,
    config: &AuthConfig,
) -> Result<String, TokenError> {
    let algorithm = signing_algorithm(config)?;

    // 만료는 주입받은 now로 직접 판정
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_key.expose_secret().as_bytes()),
        &validation,
    )
    .map_err(|_| TokenError::Invalid)?;

    if data.claims.exp <= now.timestamp() {
        return Err(TokenError::Expired);
    }

    data.claims.sub.ok_or(TokenError::MissingSubject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_config() -> AuthConfig {
        AuthConfig {
            secret_key: SecretString::new(
                "test-secret-key-for-jwt-testing-minimum-32-chars"
                    .to_string()
                    .into(),
            ),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
        }
    }

    #[test]
    fn test_create_and_decode_token() {
        let config = test_config();
        let now = Utc::now();

        let token = create_access_token("user@example.com", now, &config).unwrap();
        assert!(!token.is_empty());

        let subject = decode_access_token(&token, now, &config).unwrap();
        assert_eq!(subject, "user@example.com");
    }

    #[test]
    fn test_token_expiry_boundary() {
        let config = test_config();
        let now = Utc::now();
        let token = create_access_token("user@example.com", now, &config).unwrap();

        // 만료 1초 전에는 유효
        let just_before = now + Duration::minutes(30) - Duration::seconds(1);
        assert!(decode_access_token(&token, just_before, &config).is_ok());

        // 만료 시각 정각에는 이미 만료
        let at_expiry = now + Duration::minutes(30);
        assert!(matches!(
            decode_access_token(&token, at_expiry, &config),
            Err(TokenError::Expired)
        ));

        // 만료 이후에도 만료
        let after = now + Duration::minutes(31);
        assert!(matches!(
            decode_access_token(&token, after, &config),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let now = Utc::now();
        let token = create_access_token("user@example.com", now, &config).unwrap();

        let other = AuthConfig {
            secret_key: SecretString::new(
                "another-secret-key-for-jwt-testing-32-chars!!"
                    .to_string()
                    .into(),
            ),
            ..test_config()
        };
        assert!(matches!(
            decode_access_token(&token, now, &other),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let config = test_config();
        let now = Utc::now();
        let token = create_access_token("user@example.com", now, &config).unwrap();

        let mut tampered = token.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert!(matches!(
            decode_access_token(&tampered, now, &config),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let config = test_config();
        let now = Utc::now();

        assert!(matches!(
            decode_access_token("not.a.token", now, &config),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(
            decode_access_token("", now, &config),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_missing_subject_rejected() {
        let config = test_config();
        let now = Utc::now();

        // sub 없이 직접 인코딩한 토큰
        let claims = Claims {
            sub: None,
            exp: (now + Duration::minutes(30)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret_key.expose_secret().as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            decode_access_token(&token, now, &config),
            Err(TokenError::MissingSubject)
        ));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let config = test_config();
        let now = Utc::now();

        // HS512로 서명된 토큰은 HS256 설정에서 거부
        let claims = Claims {
            sub: Some("user@example.com".to_string()),
            exp: (now + Duration::minutes(30)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(config.secret_key.expose_secret().as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            decode_access_token(&token, now, &config),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_unsupported_algorithm_string() {
        let config = AuthConfig {
            algorithm: "none".to_string(),
            ..test_config()
        };
        let now = Utc::now();

        assert!(matches!(
            create_access_token("user@example.com", now, &config),
            Err(TokenError::UnsupportedAlgorithm(_))
        ));
    }
}
