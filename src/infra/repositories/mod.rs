pub mod postgres_guest_repo;
pub mod sqlite_guest_repo;
