// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::driver::RandByte;
use eapol::NONCE_LEN;

/// Generates fresh SNonces from the host's entropy source, per
/// spec.md §4.E: drawn without reseeding, never reused across resets
/// of the same PMK if the underlying PRNG is deterministic — this
/// reader holds no state of its own beyond the `RandByte` it wraps, so
/// that guarantee is the caller's (the PRNG itself must not repeat).
pub struct NonceReader<'a> {
    rand: &'a mut dyn RandByte,
}

impl<'a> NonceReader<'a> {
    pub fn new(rand: &'a mut dyn RandByte) -> Self {
        NonceReader { rand }
    }

    pub fn next(&mut self) -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        for byte in nonce.iter_mut() {
            *byte = self.rand.rand_byte();
        }
        nonce
    }
}
