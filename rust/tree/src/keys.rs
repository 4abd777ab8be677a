// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node keys for arena-based tree storage.
//!
//! Keys are created by `slotmap::SlotMap` and are only meaningful for the
//! tree that issued them.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a tree node.
    pub struct NodeKey;
}
