// Service exports
pub mod appwrite;
pub mod catalog;
pub mod completion;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use catalog::{CatalogStore, InMemoryCatalog, StoreError};
pub use completion::{CompletionError, CompletionProvider, GenerationParameters, HuggingFaceClient};
