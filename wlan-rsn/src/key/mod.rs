// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

pub mod gtk;
pub mod pmk;
pub mod ptk;

pub use self::gtk::Gtk;
pub use self::pmk::{Pmk, PmkInput};
pub use self::ptk::Ptk;
