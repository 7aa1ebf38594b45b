use std::sync::Arc;

use coalwatch_repository::PostgresRepository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<PostgresRepository>,
}

impl AppState {
    pub fn new(repository: PostgresRepository) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }
}
