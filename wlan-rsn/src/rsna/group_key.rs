// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The Group Key Handshake: one message from the AP carrying a fresh
//! (or initial) GTK, answered with a single response, per spec.md
//! §4.D's group message steps.

use crate::driver::Driver;
use crate::error::Error;
use crate::key::{Gtk, Ptk};
use crate::rsna::{sign_and_send, verify_mic};
use eapol::{KeyFrameRx, KeyFrameTx, KeyInformation, IV_LEN, KEY_TYPE_GROUP, MIC_LEN, NONCE_LEN};

pub struct GroupMsg1Outcome {
    pub gtk: Gtk,
}

/// Handles a Group Key Handshake message: verifies the MIC, replies,
/// then RC4-unwraps and returns the GTK. Per spec.md §4.D, valid in
/// states `GROUP` and `RUN` (the latter is a rekey) — the caller gates
/// state. Installing the key with the driver is left to the caller so
/// it can attach the returned `Gtk` to its own bookkeeping first.
pub fn handle_group_message1(
    frame: &KeyFrameRx,
    bss_addr: [u8; 6],
    ptk: &Ptk,
    driver: &mut dyn Driver,
) -> Result<GroupMsg1Outcome, Error> {
    verify_mic(frame, ptk.kck())?;

    let key_index = frame.key_info.key_index();

    let mut key_info = KeyInformation::default();
    key_info.set_key_descriptor_version(1);
    key_info.set_key_type(KEY_TYPE_GROUP);
    key_info.set_key_index(key_index);
    key_info.set_key_mic(true);
    key_info.set_secure(true);

    let mut response = KeyFrameTx {
        version: eapol::ProtocolVersion::Ieee802dot1x2001 as u8,
        descriptor_type: frame.descriptor_type,
        key_info,
        key_length: frame.key_length,
        key_replay_counter: frame.key_replay_counter,
        key_nonce: [0u8; NONCE_LEN],
        key_iv: [0u8; IV_LEN],
        key_rsc: 0,
        key_id: 0,
        key_mic: [0u8; MIC_LEN],
        key_data: Vec::new(),
    };
    sign_and_send(&mut response, ptk.kck(), bss_addr, driver);

    let gtk = Gtk::unwrap(key_index, &frame.key_iv, ptk.kek(), &frame.key_data)
        .ok_or(Error::AllocFailure)?;

    driver.install_group_key(gtk.index(), &gtk.key(), &gtk.mic_tx(), &gtk.mic_rx());

    Ok(GroupMsg1Outcome { gtk })
}
