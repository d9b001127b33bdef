#![no_main]

use libfuzzer_sys::fuzz_target;

use hessian2_core::{register_enum, register_record, Decoder, List, Map, Value};
use hessian2_derive::{HessianEnum, HessianObject};

#[derive(HessianObject, Debug, Clone, Default)]
#[hessian(class_name = "fuzz.Subject")]
struct Subject {
    flag: bool,
    count: i32,
    total: i64,
    ratio: f64,
    label: String,
    payload: Vec<u8>,
    items: List,
    attrs: Map,
    anything: Value,
    #[hessian(enumeration)]
    state: State,
}

#[derive(HessianEnum, Debug, Clone, Copy, Default)]
#[hessian(class_name = "fuzz.State")]
enum State {
    #[default]
    Unknown,
    On,
    Off,
}

fuzz_target!(|data: &[u8]| {
    register_record::<Subject>();
    register_enum::<State>();

    let mut decoder = Decoder::new(data);
    let _ = decoder.decode_typed::<Subject>();
});
