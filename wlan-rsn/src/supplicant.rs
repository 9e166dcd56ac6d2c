// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The single owned value the association layer threads through every
//! inbound EAPOL frame, per spec.md §9: the source's file-scope
//! PMK/PTK/GTK/state globals collapsed into one `Supplicant`.

use crate::config::Config;
use crate::driver::{Driver, RandByte, Tick};
use crate::error::Error;
use crate::key::{Gtk, Pmk, Ptk};
use crate::rsna::{admit_frame, classify, fourway, group_key, MessageKind, ReplayGuard};
use eapol::NONCE_LEN;

/// The handshake's position, per spec.md §3. `Msg1` and `Run` are the
/// start and (non-terminating, since group rekey loops back through
/// it) end states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Msg1,
    Msg3,
    Group,
    Run,
}

/// Owns everything the handshake mutates for one association: PMK for
/// its lifetime, the current state, the AP's ANonce and the derived
/// PTK once known, the installed GTK, and the replay guard. Single
/// writer (the dispatcher in `on_eapol_frame`); no locking, per
/// spec.md §5.
pub struct Supplicant {
    config: Config,
    pmk: Pmk,
    replay: ReplayGuard,
    state: State,
    anonce: Option<[u8; NONCE_LEN]>,
    ptk: Option<Ptk>,
    gtk: Option<Gtk>,
}

impl Supplicant {
    /// Derives the PMK per `config.pmk_input` and starts in `Msg1`.
    /// `tick`/`progress` are only consulted on the `PmkInput::Passphrase`
    /// path (spec.md §4.B); pass `NullTick` and `None` for
    /// `PmkInput::Raw`, which never suspends. `driver` is only touched
    /// by `tick.drain_rx` during that same path.
    pub fn new(
        config: Config,
        tick: &mut dyn Tick,
        driver: &mut dyn Driver,
        progress: Option<&mut dyn FnMut(crate::driver::Progress)>,
    ) -> Supplicant {
        let pmk = Pmk::derive(&config.pmk_input, tick, driver, progress);
        Supplicant {
            config,
            pmk,
            replay: ReplayGuard::new(),
            state: State::Msg1,
            anonce: None,
            ptk: None,
            gtk: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn gtk(&self) -> Option<&Gtk> {
        self.gtk.as_ref()
    }

    /// Resets to `Msg1` and drops all handshake state, per spec.md §5's
    /// deassociation handling. Installed keys are left to the caller to
    /// invalidate via the driver — this only resets the protocol state.
    pub fn reset(&mut self) {
        self.replay.reset();
        self.state = State::Msg1;
        self.anonce = None;
        self.ptk = None;
        self.gtk = None;
    }

    /// Feeds one inbound 802.11 data frame carrying EAPOL (LLC/SNAP
    /// prefix present), per spec.md §6's `eapol_input`. Every failure
    /// is a silent drop, per spec.md §7 — the `Err` is returned for a
    /// caller that wants to log or count it, not to change behavior.
    pub fn on_eapol_frame(
        &mut self,
        buf: &[u8],
        wpa_active: bool,
        rand: &mut dyn RandByte,
        driver: &mut dyn Driver,
    ) -> Result<(), Error> {
        let frame = match admit_frame(buf, wpa_active, &mut self.replay) {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("dropping inbound EAPOL frame: {}", e);
                return Err(e);
            }
        };
        let kind = match classify(&frame.key_info) {
            Some(kind) => kind,
            None => {
                log::debug!("dropping EAPOL frame matching no known message shape");
                return Err(Error::UnknownMessage);
            }
        };

        let result = match (kind, self.state) {
            (MessageKind::FourWayMsg1, State::Msg1) | (MessageKind::FourWayMsg1, State::Msg3) => {
                let outcome =
                    fourway::handle_message1(&frame, &self.config, &self.pmk, rand, driver);
                self.anonce = Some(outcome.anonce);
                self.ptk = Some(outcome.ptk);
                self.state = State::Msg3;
                Ok(())
            }
            (MessageKind::FourWayMsg3, State::Msg3) | (MessageKind::FourWayMsg3, State::Group) => {
                let anonce = self.anonce.ok_or(Error::InappropriateState)?;
                let ptk = self.ptk.as_ref().ok_or(Error::InappropriateState)?.clone();
                fourway::handle_message3(&frame, &self.config, &anonce, &ptk, driver).map(|()| {
                    self.state = State::Group;
                })
            }
            (MessageKind::GroupMsg1, State::Group) | (MessageKind::GroupMsg1, State::Run) => {
                let ptk = self.ptk.as_ref().ok_or(Error::InappropriateState)?.clone();
                group_key::handle_group_message1(&frame, self.config.bss_addr, &ptk, driver).map(
                    |outcome| {
                        self.gtk = Some(outcome.gtk);
                        self.state = State::Run;
                    },
                )
            }
            (kind, state) => {
                log::debug!("{:?} is not expected in state {:?}", kind, state);
                Err(Error::InappropriateState)
            }
        };

        if let Err(ref e) = result {
            log::debug!("EAPOL frame handling failed: {}", e);
        } else {
            log::trace!("handshake state is now {:?}", self.state);
        }
        result
    }
}
