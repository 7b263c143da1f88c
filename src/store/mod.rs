pub mod conversation_store;
pub mod session_identity;

pub use conversation_store::ConversationStore;
pub use session_identity::SessionIdentity;
