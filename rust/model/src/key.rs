// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key type for arena-based assembly node storage.

use slotmap::new_key_type;

new_key_type! {
    /// Key for an assembly node in the model arena.
    ///
    /// Keys are stable for the lifetime of the model and are `Copy`, `Eq`
    /// and `Hash`, which is what lets the conversion engine use them as
    /// cache keys (mesh cache, instance paths) without borrowing the model.
    pub struct NodeKey;
}
