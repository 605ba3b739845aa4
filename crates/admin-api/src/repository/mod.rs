//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 모든 Repository는 static methods 패턴을 사용합니다.

pub mod orders;
pub mod permissions;
pub mod roles;
pub mod sales;
pub mod users;

pub use orders::{NewOrder, NewOrderItem, OrderChanges, OrderPages, OrderRepository};
pub use permissions::PermissionRepository;
pub use roles::RoleRepository;
pub use sales::SalesRepository;
pub use users::{NewUser, UserChanges, UserPages, UserRepository};
