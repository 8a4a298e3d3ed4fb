//! Client code for camply.
//!
//! This crate provides the chat assistant client and the cache-through campus
//! content service shared by the server.

pub mod assistant;
pub mod campus;

pub use assistant::{AssistantClient, AssistantConfig, AssistantError, AssistantReply, ChatMessage, ChatRequest, Role};

pub use campus::{CampusContent, CampusContentService, CampusContext, ContentGenerator, ContentRequest, ContentType};
