//! 서비스 전반에서 사용되는 공통 타입.

mod cpf;

pub use cpf::*;
