// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The 4-Way Handshake proper: message 1 (PTK derivation, message 2
//! reply, TK install) and message 3 (MIC verification, message 4
//! reply), per spec.md §4.D.

use crate::config::Config;
use crate::crypto_utils::nonce::NonceReader;
use crate::driver::{Driver, RandByte};
use crate::error::Error;
use crate::key::{Pmk, Ptk};
use crate::rsna::{sign_and_send, verify_mic};
use eapol::{KeyFrameRx, KeyFrameTx, KeyInformation, IV_LEN, KEY_TYPE_PAIRWISE, MIC_LEN, NONCE_LEN};

/// The fixed WPA RSN IE this station advertises in message 2, per
/// spec.md §4.D step 4 and §6's wire constants.
pub const RSN_IE: [u8; 24] = [
    0xdd, 0x16, 0x00, 0x50, 0xf2, 0x01, 0x01, 0x00, 0x00, 0x50, 0xf2, 0x02, 0x01, 0x00, 0x00, 0x50,
    0xf2, 0x02, 0x01, 0x00, 0x00, 0x50, 0xf2, 0x02,
];

/// What message 1 handling leaves for the state machine to remember:
/// the AP's ANonce (needed to validate message 3) and the freshly
/// derived PTK.
pub struct Msg1Outcome {
    pub anonce: [u8; NONCE_LEN],
    pub ptk: Ptk,
}

fn pairwise_key_info(mic: bool) -> KeyInformation {
    let mut key_info = KeyInformation::default();
    key_info.set_key_descriptor_version(1);
    key_info.set_key_type(KEY_TYPE_PAIRWISE);
    key_info.set_key_mic(mic);
    key_info
}

/// Handles a 4-Way message 1: stores ANonce, draws a fresh SNonce,
/// derives the PTK, replies with message 2, and installs the pairwise
/// TK. Per spec.md §4.D, valid in states `MSG1` and `MSG3` — the
/// caller is responsible for that state gate.
pub fn handle_message1(
    frame: &KeyFrameRx,
    config: &Config,
    pmk: &Pmk,
    rand: &mut dyn RandByte,
    driver: &mut dyn Driver,
) -> Msg1Outcome {
    let anonce = frame.key_nonce;
    let snonce = NonceReader::new(rand).next();

    let ptk = Ptk::derive(pmk, &config.bss_addr, &config.sta_addr, &anonce, &snonce);

    let mut msg2 = KeyFrameTx {
        version: eapol::ProtocolVersion::Ieee802dot1x2001 as u8,
        descriptor_type: frame.descriptor_type,
        key_info: pairwise_key_info(true),
        // The original zeroes msg 2's key length rather than echoing
        // the AP's; only msg 4 and the group response echo it.
        key_length: 0,
        key_replay_counter: frame.key_replay_counter,
        key_nonce: snonce,
        key_iv: [0u8; IV_LEN],
        key_rsc: 0,
        key_id: 0,
        key_mic: [0u8; MIC_LEN],
        key_data: RSN_IE.to_vec(),
    };
    sign_and_send(&mut msg2, ptk.kck(), config.bss_addr, driver);

    driver.install_pairwise_key(&ptk.tk(), &ptk.mic_tx(), &ptk.mic_rx());

    Msg1Outcome { anonce, ptk }
}

/// Handles a 4-Way message 3: verifies key type, ANonce, and MIC, then
/// replies with message 4. Per spec.md §4.D, valid in states `MSG3`
/// and `GROUP` (covering message-4 loss) — the caller gates state.
pub fn handle_message3(
    frame: &KeyFrameRx,
    config: &Config,
    anonce: &[u8; NONCE_LEN],
    ptk: &Ptk,
    driver: &mut dyn Driver,
) -> Result<(), Error> {
    if frame.key_info.key_type() != KEY_TYPE_PAIRWISE {
        return Err(Error::UnknownMessage);
    }
    if frame.key_nonce != *anonce {
        return Err(Error::NonceMismatch);
    }
    verify_mic(frame, ptk.kck())?;

    let mut msg4 = KeyFrameTx {
        version: eapol::ProtocolVersion::Ieee802dot1x2001 as u8,
        descriptor_type: frame.descriptor_type,
        key_info: pairwise_key_info(true),
        key_length: frame.key_length,
        key_replay_counter: frame.key_replay_counter,
        key_nonce: [0u8; NONCE_LEN],
        key_iv: [0u8; IV_LEN],
        key_rsc: 0,
        key_id: 0,
        key_mic: [0u8; MIC_LEN],
        key_data: Vec::new(),
    };
    sign_and_send(&mut msg4, ptk.kck(), config.bss_addr, driver);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::PmkInput;
    use crate::rsna::test_util;

    #[test]
    fn message1_derives_ptk_and_emits_message2() {
        let config = test_util::config();
        let mut driver = test_util::RecordingDriver::default();
        let pmk = Pmk::derive(
            &PmkInput::Raw([0u8; 32]),
            &mut crate::driver::NullTick,
            &mut driver,
            None,
        );
        let msg1 = test_util::msg1_frame(1, [0xAAu8; NONCE_LEN]);
        let mut rand = test_util::FixedByte(0x55);

        let outcome = handle_message1(&msg1, &config, &pmk, &mut rand, &mut driver);

        assert_eq!(outcome.anonce, [0xAAu8; NONCE_LEN]);
        assert_eq!(driver.sent.len(), 1);
        assert_eq!(driver.installed_pairwise.len(), 1);

        // Re-derive the expected PTK the same way and confirm the msg2
        // MIC matches HMAC-MD5(KCK, body-with-mic-zeroed).
        let (_, kck) = (outcome.ptk.clone(), outcome.ptk.kck().to_vec());
        let (bytes, _dst, encrypted, eapol) = &driver.sent[0];
        assert!(*encrypted);
        assert!(*eapol);
        let body = &bytes[eapol::LLC_SNAP_EAPOL.len()..];
        let (_, parsed) = eapol::key_frame_from_bytes(body).expect("msg2 should parse");
        let mut zeroed = parsed.clone();
        zeroed.key_mic = [0u8; eapol::MIC_LEN];
        let mut buf = Vec::new();
        zeroed.reconstruct().write_into_with_body_length(zeroed.body_length, true, &mut buf);
        let expected = wlan_crypto::hmac_md5(&kck, &buf);
        assert_eq!(parsed.key_mic, expected);
    }

    #[test]
    fn message3_rejects_anonce_mismatch() {
        let config = test_util::config();
        let ptk = test_util::fixed_ptk();
        let anonce = [0xAAu8; NONCE_LEN];
        let mut driver = test_util::RecordingDriver::default();

        let mut msg3 = test_util::msg3_frame(2, [0xBBu8; NONCE_LEN], &ptk);
        msg3.key_nonce = [0xFFu8; NONCE_LEN]; // does not match stored ANonce

        let result = handle_message3(&msg3, &config, &anonce, &ptk, &mut driver);
        assert_eq!(result, Err(Error::NonceMismatch));
        assert!(driver.sent.is_empty());
    }

    #[test]
    fn message3_rejects_bad_mic() {
        let config = test_util::config();
        let ptk = test_util::fixed_ptk();
        let anonce = [0xAAu8; NONCE_LEN];
        let mut driver = test_util::RecordingDriver::default();

        let mut msg3 = test_util::msg3_frame(2, anonce, &ptk);
        msg3.key_mic = [0xFFu8; eapol::MIC_LEN]; // wrong MIC (e.g. wrong PSK)

        let result = handle_message3(&msg3, &config, &anonce, &ptk, &mut driver);
        assert_eq!(result, Err(Error::MicInvalid));
        assert!(driver.sent.is_empty());
    }

    #[test]
    fn message3_accepts_valid_mic_and_emits_message4() {
        let config = test_util::config();
        let ptk = test_util::fixed_ptk();
        let anonce = [0xAAu8; NONCE_LEN];
        let mut driver = test_util::RecordingDriver::default();

        let msg3 = test_util::msg3_frame(2, anonce, &ptk);
        let result = handle_message3(&msg3, &config, &anonce, &ptk, &mut driver);

        assert!(result.is_ok());
        assert_eq!(driver.sent.len(), 1);
    }
}
