//! 인증 및 권한 부여.
//!
//! 비밀번호 해싱, JWT 토큰 발급/검증, 요청 인증 추출기를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체
//! - [`CurrentUser`]: Axum 핸들러용 인증 추출기
//! - 토큰 생성/검증 함수, 비밀번호 해싱/검증 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! // 보호된 라우트에서 CurrentUser 추출기 사용
//! async fn protected_handler(
//!     CurrentUser(user): CurrentUser,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

mod extractor;
mod jwt;
mod password;

pub use extractor::CurrentUser;
pub use jwt::{create_access_token, decode_access_token, Claims, TokenError};
pub use password::{hash_password, verify_password, PasswordError};
