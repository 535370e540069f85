//! Fuzz target: status body decoding

#![no_main]

use libfuzzer_sys::fuzz_target;
use rollcall_proto::StatusBody;

fuzz_target!(|data: &[u8]| {
    let _ = StatusBody::decode(data);
});
