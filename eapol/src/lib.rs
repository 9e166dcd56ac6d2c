// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Byte-exact encode/decode of 802.1X EAPOL-Key frames over an 802.2
//! LLC/SNAP header, scoped to the WPA/WPA2-PSK 4-Way and Group Key
//! Handshakes (key descriptor version 1, HMAC-MD5 MIC, 16-byte MIC
//! field). See IEEE Std 802.11-2016, 12.7.2, Figure 12-32, and IEEE Std
//! 802.1X-2010, 11.3/11.9.

use bitfield::bitfield;
use bytes::{BufMut, Bytes};
use nom::{be_u16, be_u64, be_u8, do_parse, error_position, named, take, verify};
use std::convert::AsMut;

/// `AA AA 03 00 00 00 88 8E` — SNAP header for EAPOL (EtherType 0x888E).
pub const LLC_SNAP_EAPOL: [u8; 8] = [0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00, 0x88, 0x8e];

pub const NONCE_LEN: usize = 32;
pub const IV_LEN: usize = 16;
pub const MIC_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    Ieee802dot1x2001 = 1,
    Ieee802dot1x2004 = 2,
}

impl ProtocolVersion {
    pub fn from_u8(v: u8) -> Option<ProtocolVersion> {
        match v {
            1 => Some(ProtocolVersion::Ieee802dot1x2001),
            2 => Some(ProtocolVersion::Ieee802dot1x2004),
            _ => None,
        }
    }
}

pub const PACKET_TYPE_KEY: u8 = 3;

/// IEEE Std 802.11-2016 Table 9-59: 254 is the vendor-specific WPA1
/// descriptor; 2 is the IEEE 802.11 (RSN/WPA2) descriptor. This station
/// accepts either — the descriptor selects framing, not the MIC
/// algorithm, which is fixed to HMAC-MD5/TKIP throughout this crate.
pub const DESCRIPTOR_TYPE_WPA1: u8 = 254;
pub const DESCRIPTOR_TYPE_RSN: u8 = 2;

pub fn is_supported_descriptor(d: u8) -> bool {
    d == DESCRIPTOR_TYPE_WPA1 || d == DESCRIPTOR_TYPE_RSN
}

// IEEE Std 802.11-2016, 12.7.2, Figure 12-33.
bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct KeyInformation(u16);
    impl Debug;
    pub key_descriptor_version, set_key_descriptor_version: 2, 0;
    pub key_type, set_key_type: 3, 3;
    pub key_index, set_key_index: 5, 4;
    pub install, set_install: 6;
    pub key_ack, set_key_ack: 7;
    pub key_mic, set_key_mic: 8;
    pub secure, set_secure: 9;
    pub error, set_error: 10;
    pub request, set_request: 11;
    pub encrypted_key_data, set_encrypted_key_data: 12;
    pub value, _: 15, 0;
}

impl Default for KeyInformation {
    fn default() -> KeyInformation {
        KeyInformation(0)
    }
}

// `KeyInformation`'s `bitfield!` block gives no field an explicit
// per-field type, so every accessor (including `key_type`/`key_index`)
// returns the struct's own base type, `u16` — these constants must
// match so callers can compare/assign directly against `key_type()`.
pub const KEY_TYPE_GROUP: u16 = 0;
pub const KEY_TYPE_PAIRWISE: u16 = 1;

fn to_array<A>(slice: &[u8]) -> A
where
    A: Sized + Default + AsMut<[u8]>,
{
    let mut array = Default::default();
    <A as AsMut<[u8]>>::as_mut(&mut array).clone_from_slice(slice);
    array
}

/// A decoded, borrowed view over a received EAPOL-Key frame. Offsets
/// follow spec.md §4.C exactly; the LLC/SNAP prefix is assumed already
/// stripped/verified by the caller (the MAC layer delivers EAPOL frames
/// with the LLC prefix present, per spec.md §6, but the codec itself
/// only concerns itself with the EAPOL body onward — callers needing the
/// LLC bytes for retransmission slice them from the original buffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFrameRx {
    pub version: u8,
    pub packet_type: u8,
    pub body_length: u16,
    pub descriptor_type: u8,
    pub key_info: KeyInformation,
    pub key_length: u16,
    pub key_replay_counter: u64,
    pub key_nonce: [u8; NONCE_LEN],
    pub key_iv: [u8; IV_LEN],
    pub key_rsc: u64,
    pub key_id: u64,
    pub key_mic: [u8; MIC_LEN],
    pub key_data_len: u16,
    pub key_data: Bytes,
}

impl KeyFrameRx {
    /// Rebuilds this received frame as a `KeyFrameTx`, for byte-exact
    /// reserialization with the MIC field zeroed (spec.md §3 invariant
    /// 3). Every wire byte this codec parses is captured in a named
    /// field, so this round-trips exactly but for the MIC.
    pub fn reconstruct(&self) -> KeyFrameTx {
        KeyFrameTx {
            version: self.version,
            descriptor_type: self.descriptor_type,
            key_info: self.key_info,
            key_length: self.key_length,
            key_replay_counter: self.key_replay_counter,
            key_nonce: self.key_nonce,
            key_iv: self.key_iv,
            key_rsc: self.key_rsc,
            key_id: self.key_id,
            key_mic: self.key_mic,
            key_data: self.key_data.to_vec(),
        }
    }
}

named!(pub key_frame_from_bytes<&[u8], KeyFrameRx>,
    do_parse!(
        version: be_u8 >>
        packet_type: verify!(be_u8, |v: u8| v == PACKET_TYPE_KEY) >>
        body_length: be_u16 >>
        descriptor_type: verify!(be_u8, |v: u8| is_supported_descriptor(v)) >>
        key_info: be_u16 >>
        key_length: be_u16 >>
        key_replay_counter: be_u64 >>
        key_nonce: take!(NONCE_LEN) >>
        key_iv: take!(IV_LEN) >>
        key_rsc: be_u64 >>
        key_id: be_u64 >>
        key_mic: take!(MIC_LEN) >>
        key_data_len: be_u16 >>
        key_data: take!(key_data_len) >>
        (KeyFrameRx {
            version,
            packet_type,
            body_length,
            descriptor_type,
            key_info: KeyInformation(key_info),
            key_length,
            key_replay_counter,
            key_nonce: to_array(key_nonce),
            key_iv: to_array(key_iv),
            key_rsc,
            key_id,
            key_mic: to_array(key_mic),
            key_data_len,
            key_data: Bytes::from(key_data),
        })
    )
);

/// Minimum length of the EAPOL body (from `protocol_version` onward,
/// i.e. with the LLC/SNAP prefix already stripped) with zero-length key
/// data: 1+1+2+1+2+2+8+32+16+8+8+16+2 bytes. Used by the entry filter's
/// length check.
pub const MIN_KEY_FRAME_LEN: usize = 99;

/// Same threshold including the 8-byte LLC/SNAP prefix, for callers that
/// hand the codec a full on-air frame.
pub const MIN_KEY_FRAME_LEN_WITH_LLC: usize = MIN_KEY_FRAME_LEN + LLC_SNAP_EAPOL.len();

/// An owned, builder-style frame this station constructs (message 2,
/// message 4, the group response). Mirrors `KeyFrameRx`'s fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFrameTx {
    pub version: u8,
    pub descriptor_type: u8,
    pub key_info: KeyInformation,
    pub key_length: u16,
    pub key_replay_counter: u64,
    pub key_nonce: [u8; NONCE_LEN],
    pub key_iv: [u8; IV_LEN],
    pub key_rsc: u64,
    pub key_id: u64,
    pub key_mic: [u8; MIC_LEN],
    pub key_data: Vec<u8>,
}

impl KeyFrameTx {
    pub fn body_len(&self) -> u16 {
        // descriptor_type(1) + key_info(2) + key_length(2) + replay(8) +
        // nonce(32) + iv(16) + rsc(8) + id(8) + mic(16) + data_len(2)
        (1 + 2 + 2 + 8 + NONCE_LEN + IV_LEN + 8 + 8 + MIC_LEN + 2 + self.key_data.len()) as u16
    }

    /// Serializes the full EAPOL body (no LLC/SNAP prefix), starting at
    /// `protocol_version`, as spec.md §3 invariant 3 requires for MIC
    /// computation and wire transmission alike. Uses this frame's own
    /// computed body length.
    pub fn write_into(&self, clear_mic: bool, buf: &mut Vec<u8>) {
        let body_len = self.body_len();
        self.write_into_with_body_length(body_len, clear_mic, buf);
    }

    /// As `write_into`, but with an explicit `body_length` rather than
    /// one computed from this frame's own fields. Used to reconstruct
    /// a *received* frame's bytes (with its MIC zeroed) for MIC
    /// verification: spec.md §4.D requires recomputing the MIC over
    /// `body_length+4` bytes using the incoming `body_length` field
    /// verbatim, not a freshly recomputed one.
    pub fn write_into_with_body_length(&self, body_len: u16, clear_mic: bool, buf: &mut Vec<u8>) {
        buf.reserve(2 + body_len as usize);

        buf.put_u8(self.version);
        buf.put_u8(PACKET_TYPE_KEY);
        buf.put_u16_be(body_len);
        buf.put_u8(self.descriptor_type);
        buf.put_u16_be(self.key_info.value());
        buf.put_u16_be(self.key_length);
        buf.put_u64_be(self.key_replay_counter);
        buf.put_slice(&self.key_nonce[..]);
        buf.put_slice(&self.key_iv[..]);
        buf.put_u64_be(self.key_rsc);
        buf.put_u64_be(self.key_id);
        if clear_mic {
            buf.put_slice(&[0u8; MIC_LEN][..]);
        } else {
            buf.put_slice(&self.key_mic[..]);
        }
        buf.put_u16_be(self.key_data.len() as u16);
        buf.put_slice(&self.key_data[..]);
    }

    /// Serializes the full on-air frame, including the LLC/SNAP prefix.
    pub fn write_with_llc(&self, clear_mic: bool, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&LLC_SNAP_EAPOL[..]);
        self.write_into(clear_mic, buf);
    }
}
