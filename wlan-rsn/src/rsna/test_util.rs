// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Shared fixtures for `rsna` unit tests: fixed addresses, a fixed PTK
//! derived the same way production code derives one, a deterministic
//! `RandByte`, and a `Driver` that records every call instead of
//! touching real hardware.

use crate::config::Config;
use crate::driver::{Driver, RandByte};
use crate::key::{Pmk, PmkInput, Ptk};
use eapol::{
    KeyFrameRx, KeyFrameTx, KeyInformation, DESCRIPTOR_TYPE_WPA1, IV_LEN, KEY_TYPE_GROUP,
    KEY_TYPE_PAIRWISE, MIC_LEN, NONCE_LEN,
};

pub const STA_ADDR: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x02, 0x00];
pub const BSS_ADDR: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x01, 0x00];

pub fn config() -> Config {
    Config::new(STA_ADDR, BSS_ADDR, PmkInput::Raw([0u8; 32]))
}

/// A PTK derived exactly as `fourway::handle_message1` would, from the
/// all-zero PMK and the fixed ANonce/SNonce pair, for tests that need
/// a PTK without going through message 1 first.
pub fn fixed_ptk() -> Ptk {
    let pmk = Pmk::from_raw([0u8; 32]);
    let anonce = [0xAAu8; NONCE_LEN];
    let snonce = [0x55u8; NONCE_LEN];
    Ptk::derive(&pmk, &BSS_ADDR, &STA_ADDR, &anonce, &snonce)
}

pub struct FixedByte(pub u8);

impl RandByte for FixedByte {
    fn rand_byte(&mut self) -> u8 {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingDriver {
    pub sent: Vec<(Vec<u8>, [u8; 6], bool, bool)>,
    pub installed_pairwise: Vec<([u8; 16], [u8; 8], [u8; 8])>,
    pub installed_group: Vec<(u8, [u8; 16], [u8; 8], [u8; 8])>,
}

impl Driver for RecordingDriver {
    fn send(&mut self, bytes: &[u8], dst: [u8; 6], encrypted: bool, eapol: bool) {
        self.sent.push((bytes.to_vec(), dst, encrypted, eapol));
    }

    fn install_pairwise_key(&mut self, tk: &[u8; 16], tx_mic: &[u8; 8], rx_mic: &[u8; 8]) {
        self.installed_pairwise.push((*tk, *tx_mic, *rx_mic));
    }

    fn install_group_key(&mut self, index: u8, gtk: &[u8; 16], tx_mic: &[u8; 8], rx_mic: &[u8; 8]) {
        self.installed_group.push((index, *gtk, *tx_mic, *rx_mic));
    }

    fn recv(&mut self) -> Option<Vec<u8>> {
        None
    }
}

fn base_frame(key_info: KeyInformation, replay_counter: u64, nonce: [u8; NONCE_LEN]) -> KeyFrameTx {
    KeyFrameTx {
        version: 1,
        descriptor_type: DESCRIPTOR_TYPE_WPA1,
        key_info,
        key_length: 32,
        key_replay_counter: replay_counter,
        key_nonce: nonce,
        key_iv: [0u8; IV_LEN],
        key_rsc: 0,
        key_id: 0,
        key_mic: [0u8; MIC_LEN],
        key_data: Vec::new(),
    }
}

fn parse(tx: &KeyFrameTx) -> KeyFrameRx {
    let mut buf = Vec::new();
    tx.write_into(false, &mut buf);
    let (_, frame) = eapol::key_frame_from_bytes(&buf).expect("constructed test frame should parse");
    frame
}

fn mic_frame(tx: &mut KeyFrameTx, kck: &[u8]) {
    let mut buf = Vec::new();
    tx.write_into(true, &mut buf);
    tx.key_mic = wlan_crypto::hmac_md5(kck, &buf);
}

/// A 4-way message 1 as the AP would send it: unauthenticated (no
/// MIC), carrying ANonce.
pub fn msg1_frame(replay_counter: u64, anonce: [u8; NONCE_LEN]) -> KeyFrameRx {
    let mut key_info = KeyInformation::default();
    key_info.set_key_descriptor_version(1);
    key_info.set_key_type(KEY_TYPE_PAIRWISE);
    key_info.set_key_ack(true);
    let tx = base_frame(key_info, replay_counter, anonce);
    parse(&tx)
}

/// A message 3, MICed with `ptk`'s KCK as a real AP would.
pub fn msg3_frame(replay_counter: u64, anonce: [u8; NONCE_LEN], ptk: &Ptk) -> KeyFrameRx {
    let mut key_info = KeyInformation::default();
    key_info.set_key_descriptor_version(1);
    key_info.set_key_type(KEY_TYPE_PAIRWISE);
    key_info.set_key_ack(true);
    key_info.set_key_mic(true);
    let mut tx = base_frame(key_info, replay_counter, anonce);
    mic_frame(&mut tx, ptk.kck());
    parse(&tx)
}

/// A group message 1 carrying `gtk0` RC4-wrapped under `key_iv ∥ KEK`
/// (discard 256), MICed with `ptk`'s KCK.
pub fn group_msg1_frame(
    replay_counter: u64,
    key_index: u8,
    ptk: &Ptk,
    gtk0: &[u8; 32],
) -> KeyFrameRx {
    let key_iv = [0x22u8; IV_LEN];
    let mut rc4_key = Vec::with_capacity(32);
    rc4_key.extend_from_slice(&key_iv);
    rc4_key.extend_from_slice(ptk.kek());
    let mut ciphertext = *gtk0;
    wlan_crypto::rc4_discard256_decrypt(&rc4_key, &mut ciphertext);

    let mut key_info = KeyInformation::default();
    key_info.set_key_descriptor_version(1);
    key_info.set_key_type(KEY_TYPE_GROUP);
    key_info.set_key_index(key_index);
    key_info.set_key_ack(true);
    key_info.set_key_mic(true);
    key_info.set_secure(true);

    let mut tx = base_frame(key_info, replay_counter, [0u8; NONCE_LEN]);
    tx.key_iv = key_iv;
    tx.key_data = ciphertext.to_vec();
    mic_frame(&mut tx, ptk.kck());
    parse(&tx)
}
