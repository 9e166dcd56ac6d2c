// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The narrow interfaces this crate consumes from its host, per
//! spec.md §6. Everything below the 4-Way/Group Key Handshake logic —
//! the 802.11 MAC, the USB host controller, the radio driver's cipher
//! installation, entropy, the clock, and debug logging transport — is
//! an external collaborator reached only through these traits.

/// Transmission and key installation, implemented by the radio driver.
/// `install_*` is idempotent per index, matching `radio.install_key`
/// in spec.md §6.
pub trait Driver {
    /// Best-effort transmission of a fully-framed (LLC/SNAP + EAPOL)
    /// buffer to `dst`.
    fn send(&mut self, bytes: &[u8], dst: [u8; 6], encrypted: bool, eapol: bool);

    /// Installs the pairwise TKIP cipher: `tk` is bytes 32..47 of the
    /// PTK, `tx_mic`/`rx_mic` are bytes 48..55/56..63. Also zeroes the
    /// TKIP TSC, per spec.md §4.D step 7.
    fn install_pairwise_key(&mut self, tk: &[u8; 16], tx_mic: &[u8; 8], rx_mic: &[u8; 8]);

    /// Installs a TKIP group key at `index`, per spec.md §4.D group
    /// message step 4.
    fn install_group_key(&mut self, index: u8, gtk: &[u8; 16], tx_mic: &[u8; 8], rx_mic: &[u8; 8]);

    /// Drains one queued received frame, if any. Used only during the
    /// long PBKDF2 derivation (spec.md §5); frames observed here are
    /// discarded, not processed — the handshake has not started yet.
    fn recv(&mut self) -> Option<Vec<u8>>;
}

/// Cooperative-yield hook for the PBKDF2 derivation (spec.md §4.B, §5).
/// Invoked at a bounded stride so host-controller events are pumped,
/// the watchdog is tickled, and any queued received frames are drained
/// (and discarded) while the derivation runs.
pub trait Tick {
    fn watchdog_clear(&mut self);
    fn host_events(&mut self);

    /// Drains and discards queued receive frames. Implementations that
    /// need the driver to do so (e.g. to free HCD buffers) take it as
    /// an argument rather than owning it, since `Driver` is otherwise
    /// owned by the `Supplicant`, not the `Tick` implementation.
    fn drain_rx(&mut self, driver: &mut dyn Driver);
}

/// A no-op `Tick`, for tests and for deriving a PMK before any frames
/// can possibly have arrived (e.g. `PmkInput::Raw`, which never loops).
pub struct NullTick;

impl Tick for NullTick {
    fn watchdog_clear(&mut self) {}
    fn host_events(&mut self) {}
    fn drain_rx(&mut self, _driver: &mut dyn Driver) {}
}

/// A CSPRNG byte source, per spec.md §6's `rand_byte() -> u8`.
pub trait RandByte {
    fn rand_byte(&mut self) -> u8;
}

/// Progress of a long PBKDF2 derivation, for an optional status
/// callback (e.g. LED quadrants per spec.md §4.B). This is UI, not
/// protocol, so it is plumbed separately from `Tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub iterations_done: u32,
    pub iterations_total: u32,
}
