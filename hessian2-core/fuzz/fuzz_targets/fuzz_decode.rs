#![no_main]

use libfuzzer_sys::fuzz_target;

use hessian2_core::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut decoder = Decoder::new(data);
    // drain the stream; every outcome except a panic is acceptable
    for _ in 0..64 {
        match decoder.decode() {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => break,
        }
    }
});
