// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

pub mod fourway;
pub mod group_key;
#[cfg(test)]
pub mod test_util;

use crate::driver::Driver;
use crate::Error;
use eapol::{KeyFrameRx, KeyFrameTx, KeyInformation, ProtocolVersion, MIN_KEY_FRAME_LEN};
use wlan_crypto::hmac_md5;

/// Tracks the monotonic 8-byte replay counter the AP attaches to each
/// key message, per spec.md §3/§4.E: `active` is false until the first
/// otherwise-valid frame, whose counter is then recorded
/// unconditionally; every later frame must present a strictly greater
/// counter.
#[derive(Debug, Default)]
pub struct ReplayGuard {
    counter: u64,
    active: bool,
}

impl ReplayGuard {
    pub fn new() -> ReplayGuard {
        ReplayGuard { counter: 0, active: false }
    }

    /// Returns `true` and records `incoming` if it admits the counter,
    /// `false` (no state change) otherwise.
    pub fn admit(&mut self, incoming: u64) -> bool {
        if self.active && incoming <= self.counter {
            return false;
        }
        self.counter = incoming;
        self.active = true;
        true
    }

    pub fn current(&self) -> u64 {
        self.counter
    }

    pub fn reset(&mut self) {
        self.counter = 0;
        self.active = false;
    }
}

/// Which handshake message an admitted frame's `key_info` matches, per
/// spec.md §4.D's dispatch predicate table. Frames matching none of
/// these are silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    FourWayMsg1,
    FourWayMsg3,
    GroupMsg1,
}

pub fn classify(key_info: &KeyInformation) -> Option<MessageKind> {
    let pairwise = key_info.key_type() == eapol::KEY_TYPE_PAIRWISE;
    let group = key_info.key_type() == eapol::KEY_TYPE_GROUP;

    if key_info.error() || key_info.request() {
        return None;
    }

    if pairwise
        && key_info.key_index() == 0
        && key_info.key_ack()
        && !key_info.key_mic()
        && !key_info.secure()
    {
        return Some(MessageKind::FourWayMsg1);
    }

    if pairwise
        && key_info.key_index() == 0
        && key_info.key_ack()
        && key_info.key_mic()
        && !key_info.secure()
    {
        return Some(MessageKind::FourWayMsg3);
    }

    if group
        && key_info.key_index() != 0
        && key_info.key_ack()
        && key_info.key_mic()
        && key_info.secure()
    {
        return Some(MessageKind::GroupMsg1);
    }

    None
}

/// Applies the entry filter from spec.md §4.D to a buffer that still
/// carries its LLC/SNAP prefix, admitting it against `replay` in the
/// process. `wpa_active` models check 1 ("drop if the active cipher is
/// not WPA") — the MAC layer's concern, surfaced here as a flag rather
/// than re-implemented.
pub fn admit_frame<'a>(
    buf: &'a [u8],
    wpa_active: bool,
    replay: &mut ReplayGuard,
) -> Result<KeyFrameRx, Error> {
    if !wpa_active {
        return Err(Error::MalformedFrame);
    }
    if buf.len() < eapol::LLC_SNAP_EAPOL.len() || &buf[..8] != &eapol::LLC_SNAP_EAPOL[..] {
        return Err(Error::MalformedFrame);
    }
    let body = &buf[8..];
    if body.len() < MIN_KEY_FRAME_LEN {
        return Err(Error::MalformedFrame);
    }

    let (_, frame) = eapol::key_frame_from_bytes(body).map_err(|_| Error::MalformedFrame)?;
    if ProtocolVersion::from_u8(frame.version).is_none() {
        return Err(Error::MalformedFrame);
    }

    if !replay.admit(frame.key_replay_counter) {
        return Err(Error::ReplayRejected);
    }

    Ok(frame)
}

/// Recomputes the MIC over `frame` (KCK-keyed HMAC-MD5, MIC field
/// zeroed, using the frame's own `body_length` verbatim) and compares
/// it against the MIC the AP sent, per spec.md §4.D steps common to
/// message 3 and the group message.
pub(crate) fn verify_mic(frame: &KeyFrameRx, kck: &[u8]) -> Result<(), Error> {
    let reconstructed = frame.reconstruct();
    let mut buf = Vec::new();
    reconstructed.write_into_with_body_length(frame.body_length, true, &mut buf);
    let computed = hmac_md5(kck, &buf);
    if computed[..] == frame.key_mic[..] {
        Ok(())
    } else {
        Err(Error::MicInvalid)
    }
}

/// MICs `tx` with `kck` and transmits it with its LLC/SNAP prefix to
/// `dst`, per spec.md §4.D step 5/transmit steps shared by message 2,
/// message 4, and the group response.
pub(crate) fn sign_and_send(tx: &mut KeyFrameTx, kck: &[u8], dst: [u8; 6], driver: &mut dyn Driver) {
    let mut buf = Vec::new();
    tx.write_into(true, &mut buf);
    tx.key_mic = hmac_md5(kck, &buf);

    let mut out = Vec::new();
    tx.write_with_llc(false, &mut out);
    driver.send(&out, dst, true, true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_guard_admits_first_frame_unconditionally() {
        let mut guard = ReplayGuard::new();
        assert!(guard.admit(5));
        assert_eq!(guard.current(), 5);
    }

    #[test]
    fn replay_guard_rejects_non_increasing() {
        let mut guard = ReplayGuard::new();
        assert!(guard.admit(5));
        assert!(!guard.admit(5));
        assert!(!guard.admit(4));
        assert_eq!(guard.current(), 5);
    }

    #[test]
    fn replay_guard_accepts_strictly_increasing() {
        let mut guard = ReplayGuard::new();
        assert!(guard.admit(1));
        assert!(guard.admit(2));
        assert_eq!(guard.current(), 2);
    }

    #[test]
    fn classify_msg1() {
        let mut ki = KeyInformation::default();
        ki.set_key_type(eapol::KEY_TYPE_PAIRWISE);
        ki.set_key_ack(true);
        assert_eq!(classify(&ki), Some(MessageKind::FourWayMsg1));
    }

    #[test]
    fn classify_msg3() {
        let mut ki = KeyInformation::default();
        ki.set_key_type(eapol::KEY_TYPE_PAIRWISE);
        ki.set_key_ack(true);
        ki.set_key_mic(true);
        assert_eq!(classify(&ki), Some(MessageKind::FourWayMsg3));
    }

    #[test]
    fn classify_group_msg1() {
        let mut ki = KeyInformation::default();
        ki.set_key_type(eapol::KEY_TYPE_GROUP);
        ki.set_key_index(1);
        ki.set_key_ack(true);
        ki.set_key_mic(true);
        ki.set_secure(true);
        assert_eq!(classify(&ki), Some(MessageKind::GroupMsg1));
    }

    #[test]
    fn classify_rejects_group_with_zero_index() {
        let mut ki = KeyInformation::default();
        ki.set_key_type(eapol::KEY_TYPE_GROUP);
        ki.set_key_ack(true);
        ki.set_key_mic(true);
        ki.set_secure(true);
        assert_eq!(classify(&ki), None);
    }

    #[test]
    fn classify_rejects_error_or_request_bit() {
        let mut ki = KeyInformation::default();
        ki.set_key_type(eapol::KEY_TYPE_PAIRWISE);
        ki.set_key_ack(true);
        ki.set_error(true);
        assert_eq!(classify(&ki), None);
    }
}
