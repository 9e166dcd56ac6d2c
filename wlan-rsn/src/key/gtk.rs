// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use wlan_crypto::rc4_discard256_decrypt;

pub const GTK_KEY_LEN: usize = 16;
pub const GTK_MIC_LEN: usize = 8;
/// 16-byte key + 8-byte Tx MIC key + 8-byte Rx MIC key (spec.md §3).
pub const GTK_MATERIAL_LEN: usize = GTK_KEY_LEN + 2 * GTK_MIC_LEN;

/// A TKIP Group Temporal Key, unwrapped from the AP's encrypted blob
/// and tagged with the key index it was advertised at.
#[derive(Clone, PartialEq, Eq)]
pub struct Gtk {
    index: u8,
    material: [u8; GTK_MATERIAL_LEN],
}

impl std::fmt::Debug for Gtk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gtk {{ index: {}, .. }}", self.index)
    }
}

impl Gtk {
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn key(&self) -> [u8; GTK_KEY_LEN] {
        let mut key = [0u8; GTK_KEY_LEN];
        key.copy_from_slice(&self.material[0..GTK_KEY_LEN]);
        key
    }

    /// Tx MIC key, per spec.md §8 S5: `GTK0[24..31]`.
    pub fn mic_tx(&self) -> [u8; GTK_MIC_LEN] {
        let mut mic = [0u8; GTK_MIC_LEN];
        mic.copy_from_slice(&self.material[24..32]);
        mic
    }

    /// Rx MIC key, per spec.md §8 S5: `GTK0[16..23]`.
    pub fn mic_rx(&self) -> [u8; GTK_MIC_LEN] {
        let mut mic = [0u8; GTK_MIC_LEN];
        mic.copy_from_slice(&self.material[16..24]);
        mic
    }

    /// Deciphers the group key blob: the RC4 key is `key_iv || KEK`
    /// (16+16 = 32 bytes), discard the first 256 keystream bytes, then
    /// decrypt `ciphertext` in place. `ciphertext` must be exactly
    /// `GTK_MATERIAL_LEN` bytes (TKIP; spec.md §4.D group message
    /// step 3).
    pub fn unwrap(index: u8, key_iv: &[u8; 16], kek: &[u8], ciphertext: &[u8]) -> Option<Gtk> {
        if ciphertext.len() != GTK_MATERIAL_LEN || kek.len() != 16 {
            return None;
        }
        let mut rc4_key = Vec::with_capacity(32);
        rc4_key.extend_from_slice(key_iv);
        rc4_key.extend_from_slice(kek);

        let mut material = [0u8; GTK_MATERIAL_LEN];
        material.copy_from_slice(ciphertext);
        rc4_discard256_decrypt(&rc4_key, &mut material);

        Some(Gtk { index, material })
    }
}
