// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! WPA/WPA2-PSK 4-Way Handshake and Group Key Handshake supplicant for
//! a constrained embedded wireless station. See each module for its
//! slice of the protocol; `supplicant::Supplicant` is the entry point
//! the association layer drives.

pub mod config;
pub mod crypto_utils;
pub mod driver;
pub mod error;
pub mod key;
pub mod rsna;
pub mod supplicant;

pub use crate::config::Config;
pub use crate::driver::{Driver, NullTick, Progress, RandByte, Tick};
pub use crate::error::Error;
pub use crate::key::{Gtk, Pmk, PmkInput, Ptk};
pub use crate::supplicant::{State, Supplicant};
