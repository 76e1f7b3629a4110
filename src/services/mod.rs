// External collaborator seams
pub mod directory;
pub mod store;

pub use directory::{DirectoryError, InMemoryDirectory, MemberDirectory};
pub use store::{AssignmentStore, InMemoryStore, StoreError};
