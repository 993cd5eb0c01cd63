mod loader;
mod remote;
mod repository;

pub use loader::{load_records_from_json, records_for_test};
pub use remote::RemoteRepository;
pub use repository::{InMemoryRepository, JsonFileRepository, QuestionRepository};

#[cfg(test)]
pub(crate) use repository::fixtures;
