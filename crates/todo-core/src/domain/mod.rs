//! 할 일 서비스의 도메인 모델.

mod todo;

pub use todo::*;
