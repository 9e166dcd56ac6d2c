// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::key::PmkInput;

/// Everything the handshake needs to know about the association it is
/// about to run, fixed for the association's lifetime. Constructed
/// once by the association layer and consumed by `Supplicant::new`,
/// per spec.md §6's `eapol_init(psk_or_pmk, ssid)`.
#[derive(Debug, Clone)]
pub struct Config {
    /// This station's MAC address (SA).
    pub sta_addr: [u8; 6],
    /// The AP's MAC address (AA).
    pub bss_addr: [u8; 6],
    pub pmk_input: PmkInput,
}

impl Config {
    pub fn new(sta_addr: [u8; 6], bss_addr: [u8; 6], pmk_input: PmkInput) -> Config {
        Config { sta_addr, bss_addr, pmk_input }
    }
}
