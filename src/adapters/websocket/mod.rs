//! WebSocket adapters for live chat.
//!
//! # Architecture
//!
//! ```text
//! SendMessageHandler / MarkReadHandler
//!                 │ ChatBroadcaster::publish
//!                 ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      RoomManager                                     │
//! │   Room: conversation-1   Room: conversation-2                        │
//! │   ├── buyer socket       ├── buyer socket                            │
//! │   └── owner socket       └── owner socket                            │
//! └─────────────────────────────────────────────────────────────────────┘
//!                 │ broadcast::Receiver<ChatEvent>
//!                 ▼
//!           chat_ws_handler (one task pair per socket)
//! ```
//!
//! # Components
//!
//! - [`messages`] - Server control frames
//! - [`rooms`] - Per-conversation broadcast rooms
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod handler;
pub mod messages;
pub mod rooms;

pub use handler::{chat_ws_handler, WsParams};
pub use messages::ServerFrame;
pub use rooms::{ClientId, RoomManager};
