// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::key::pmk::Pmk;
use eapol::NONCE_LEN;
use wlan_crypto::hmac_sha1;

/// "Pairwise key expansion" — no terminating NUL in the literal; PRF-X
/// appends a single 0x00 separator octet itself (spec.md §4.B).
const PTK_PREFIX: &[u8] = b"Pairwise key expansion";

pub const PTK_LEN: usize = 64;
const ADDR_LEN: usize = 6;

/// The 64-byte Pairwise Transient Key, partitioned per spec.md §3:
/// KCK (0..16), KEK (16..32), TK (32..48), MIC-Tx (48..56), MIC-Rx
/// (56..64).
#[derive(Clone, PartialEq, Eq)]
pub struct Ptk([u8; PTK_LEN]);

impl std::fmt::Debug for Ptk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Ptk(..)")
    }
}

impl Ptk {
    pub fn kck(&self) -> &[u8] {
        &self.0[0..16]
    }

    pub fn kek(&self) -> &[u8] {
        &self.0[16..32]
    }

    pub fn tk(&self) -> [u8; 16] {
        let mut tk = [0u8; 16];
        tk.copy_from_slice(&self.0[32..48]);
        tk
    }

    pub fn mic_tx(&self) -> [u8; 8] {
        let mut mic = [0u8; 8];
        mic.copy_from_slice(&self.0[48..56]);
        mic
    }

    pub fn mic_rx(&self) -> [u8; 8] {
        let mut mic = [0u8; 8];
        mic.copy_from_slice(&self.0[56..64]);
        mic
    }

    /// Derives the PTK from (PMK, ANonce, SNonce, AA, SA), per
    /// spec.md §4.B: `D = min(SA,AA) || max(SA,AA) || min(SNonce,ANonce)
    /// || max(SNonce,ANonce)`, then `PRF-512(PMK, "Pairwise key
    /// expansion", D)`.
    pub fn derive(
        pmk: &Pmk,
        aa: &[u8; ADDR_LEN],
        sa: &[u8; ADDR_LEN],
        anonce: &[u8; NONCE_LEN],
        snonce: &[u8; NONCE_LEN],
    ) -> Ptk {
        let mut data = Vec::with_capacity(2 * ADDR_LEN + 2 * NONCE_LEN);
        if sa <= aa {
            data.extend_from_slice(sa);
            data.extend_from_slice(aa);
        } else {
            data.extend_from_slice(aa);
            data.extend_from_slice(sa);
        }
        if snonce <= anonce {
            data.extend_from_slice(snonce);
            data.extend_from_slice(anonce);
        } else {
            data.extend_from_slice(anonce);
            data.extend_from_slice(snonce);
        }

        let expanded = prf(pmk.bytes(), PTK_PREFIX, &data, PTK_LEN);
        let mut out = [0u8; PTK_LEN];
        out.copy_from_slice(&expanded[..PTK_LEN]);
        Ptk(out)
    }
}

/// PRF-X, per spec.md §4.B: `out_i = HMAC-SHA1(K, prefix || 0x00 || D ||
/// byte(i))`, counter starting at 0 and incrementing per 20-byte block,
/// concatenated and truncated to `len` bytes.
fn prf(key: &[u8], prefix: &[u8], data: &[u8], len: usize) -> Vec<u8> {
    let mut input = Vec::with_capacity(prefix.len() + 1 + data.len() + 1);
    input.extend_from_slice(prefix);
    input.push(0);
    input.extend_from_slice(data);
    input.push(0); // single octet counter, starts at 0

    let mut output = Vec::with_capacity(len + 20);
    let counter_index = input.len() - 1;
    let mut i: u8 = 0;
    while output.len() < len {
        input[counter_index] = i;
        output.extend_from_slice(&hmac_sha1(key, &input));
        i += 1;
    }
    output.truncate(len);
    output
}
