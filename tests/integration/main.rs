//! Integration tests driving a real relay over WebSockets.

mod health_test;
mod helpers;
mod persistence_test;
mod relay_test;
