//! Domain logic
//!
//! - `movements` - the inter-branch stock transfer engine

pub mod movements;
