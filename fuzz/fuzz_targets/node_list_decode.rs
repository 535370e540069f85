//! Fuzz target: node list decoding and projection
//!
//! Any body that decodes must project without panicking, and every row must
//! respect the display name limit.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rollcall_core::{StateStore, project};
use rollcall_proto::{DISPLAY_NAME_LEN, Node};

fuzz_target!(|data: &[u8]| {
    let Ok(nodes) = Node::decode_list(data) else {
        return;
    };

    let len = nodes.len();
    let mut store = StateStore::new();
    store.set_nodes(nodes);
    let view = project(store.read());

    assert_eq!(view.rows.len(), len);
    for row in &view.rows {
        assert!(row.name.chars().count() <= DISPLAY_NAME_LEN);
    }
});
