//! Board-agnostic input synchronization logic
//!
//! Everything between a raw hardware reading and a deduplicated change event
//! that does not touch a peripheral:
//!
//! - Channel model and the input event sink
//! - Quadrature decoding and encoder sampling
//! - Bus snapshot diffing and the responder reply cache
//! - Link error accounting
//! - Node configuration
//! - GUI page model and collaborator traits

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod differ;
pub mod encoder;
pub mod link;
pub mod pages;
pub mod reply;
pub mod sink;
pub mod traits;

pub use channel::{Channel, ChannelId, ChannelIndex, ChannelKind, MAX_CHANNELS};
pub use differ::BusDiffer;
pub use encoder::{quantize, EncoderSampler, QuadratureCounter};
pub use link::{LinkError, LinkStats};
pub use pages::{BarColor, BarSlot, Page, PageSelector};
pub use reply::ReplyCache;
pub use sink::InputSink;
