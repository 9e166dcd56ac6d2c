// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use failure::Fail;

/// Every failure kind a received frame can hit, per spec.md §7. All of
/// them are handled by the dispatcher as a silent drop — no reply, no
/// state change — but are returned here so a caller can log or count
/// them instead of the protocol behavior depending on observing them.
#[derive(Debug, Fail, PartialEq, Eq)]
pub enum Error {
    #[fail(display = "frame too short or has an unsupported version/type/descriptor")]
    MalformedFrame,

    #[fail(display = "replay counter did not strictly increase")]
    ReplayRejected,

    #[fail(display = "message type is not expected in the current handshake state")]
    InappropriateState,

    #[fail(display = "MIC verification failed")]
    MicInvalid,

    #[fail(display = "ANonce in message 3 differs from message 1")]
    NonceMismatch,

    #[fail(display = "buffer exhaustion while expanding key material")]
    AllocFailure,

    #[fail(display = "frame did not match any known 4-Way or Group message shape")]
    UnknownMessage,
}
