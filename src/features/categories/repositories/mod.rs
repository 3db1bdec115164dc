pub mod category_repository;

pub use category_repository::{CategoryRepository, PgCategoryRepository};

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
