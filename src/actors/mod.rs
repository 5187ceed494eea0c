//! Actor-based reading generation
//!
//! Each monitored location runs its own generator actor as an independent
//! tokio task. Generators never talk to each other; they only share the alert
//! buffer and the broadcast hub.
//!
//! ## Architecture Overview
//!
//! ```text
//!                  ┌─────────────────────┐
//!                  │ LocationSupervisor  │
//!                  └──────────┬──────────┘
//!                             │ spawns
//!              ┌──────────────┼──────────────┐
//!              │              │              │
//!      ┌───────▼──────┐       │      ┌───────▼──────┐
//!      │ Generator A  │       │      │ Generator N  │
//!      └───┬───────┬──┘       │      └──┬───────┬───┘
//!          │       │          │         │       │
//!          │       └──────────┼─────────┘       │
//!          │            ┌─────▼───────┐         │
//!          │            │ AlertBuffer │         │
//!          │            └─────────────┘         │
//!          │                                    │
//!          └───────────┬────────────────────────┘
//!                ┌─────▼────────┐
//!                │ BroadcastHub │ ──▶ subscribers
//!                └──────────────┘
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: Each generator has an mpsc command channel for control messages
//! 2. **Events**: Samples are published to the broadcast hub for fan-out
//! 3. **Request/Response**: oneshot channels for synchronous queries (`TickNow`)

pub mod generator;
pub mod messages;
