//! Inter-task shared state
//!
//! Both input tasks write into one sink; the render task drains it.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use op2001_core::{InputSink, LinkStats, MAX_CHANNELS};

pub type SharedSink = Mutex<CriticalSectionRawMutex, RefCell<InputSink<MAX_CHANNELS>>>;

/// Authoritative channel table
pub static SINK: SharedSink = Mutex::new(RefCell::new(InputSink::new()));

/// Drop counters for both input paths
pub static STATS: Mutex<CriticalSectionRawMutex, RefCell<LinkStats>> =
    Mutex::new(RefCell::new(LinkStats::new()));

/// Raised whenever an input task changed at least one channel
pub static INPUT_CHANGED: Signal<CriticalSectionRawMutex, ()> = Signal::new();
