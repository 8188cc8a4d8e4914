// Integration tests for the price relay
//
// These tests run the real router on an ephemeral port and talk to it over
// HTTP and WebSocket:
// - Session registration and cleanup
// - Pushing cached prices to a user
// - Price refresh against a mock upstream

mod common;
mod push_flow;
mod session_lifecycle;
