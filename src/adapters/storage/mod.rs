//! Storage Adapters
//!
//! Non-database implementations of the conversation ports.
//!
//! ## Available Adapters
//!
//! - **InMemoryConversationStore** - Stores conversations in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryConversationStore;
//!
//! let store = Arc::new(InMemoryConversationStore::new());
//! let repo: Arc<dyn ConversationRepository> = store.clone();
//! let reader: Arc<dyn ConversationReader> = store;
//! ```

mod in_memory_conversation_store;

pub use in_memory_conversation_store::InMemoryConversationStore;
