// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Thin, typed wrappers around the symmetric primitives the WPA-PSK
//! handshake needs: HMAC-SHA1 (PBKDF2 and PRF-X), HMAC-MD5 (the WPA1 MIC),
//! and RC4 (the WPA1 group-key key-wrap). Nothing here is protocol-aware;
//! `wlan-rsn` owns all framing and state.

extern crate crypto;

use crypto::hmac::Hmac;
use crypto::mac::Mac;
use crypto::md5::Md5;
use crypto::rc4::Rc4 as CryptoRc4;
use crypto::sha1::Sha1;
use crypto::symmetriccipher::SynchronousStreamCipher;

/// HMAC-SHA1(key, msg), truncated to nothing — the full 20-byte digest.
pub fn hmac_sha1(key: &[u8], msg: &[u8]) -> [u8; 20] {
    let mut hmac = Hmac::new(Sha1::new(), key);
    hmac.input(msg);
    let mut out = [0u8; 20];
    out.copy_from_slice(hmac.result().code());
    out
}

/// HMAC-MD5(key, msg), the MIC algorithm for key descriptor version 1
/// (TKIP). WPA2/CCMP's HMAC-SHA1-128 MIC is out of scope per spec.
pub fn hmac_md5(key: &[u8], msg: &[u8]) -> [u8; 16] {
    let mut hmac = Hmac::new(Md5::new(), key);
    hmac.input(msg);
    let mut out = [0u8; 16];
    out.copy_from_slice(hmac.result().code());
    out
}

/// A keyed RC4 keystream generator with an explicit discard step, as
/// required by the WPA group-key key-wrap (IEEE 802.11i / WPA1
/// Annex, discard the first 256 keystream bytes before use).
pub struct Rc4 {
    inner: CryptoRc4,
}

impl Rc4 {
    pub fn new(key: &[u8]) -> Rc4 {
        Rc4 { inner: CryptoRc4::new(key) }
    }

    /// Discards `n` bytes of keystream without producing output.
    pub fn discard(&mut self, n: usize) {
        const CHUNK: usize = 64;
        let zeros = [0u8; CHUNK];
        let mut scratch = [0u8; CHUNK];
        let mut remaining = n;
        while remaining > 0 {
            let take = remaining.min(CHUNK);
            self.inner.process(&zeros[..take], &mut scratch[..take]);
            remaining -= take;
        }
    }

    /// XORs the keystream into `data` in place (encrypt and decrypt are
    /// the same operation for a stream cipher).
    pub fn process(&mut self, data: &mut [u8]) {
        let input = data.to_vec();
        self.inner.process(&input[..], data);
    }
}

/// Convenience used by `wlan-rsn`'s group-key unwrap: builds `key`,
/// discards 256 bytes, then deciphers `data` in place in one call.
pub fn rc4_discard256_decrypt(key: &[u8], data: &mut [u8]) {
    let mut rc4 = Rc4::new(key);
    rc4.discard(256);
    rc4.process(data);
}
