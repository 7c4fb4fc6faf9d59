#![no_main]
use libfuzzer_sys::fuzz_target;
use langm_lib::core::RegistryDocument;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = serde_json::from_str::<RegistryDocument>(s) {
            // Anything that parses must survive a pretty round trip.
            let text = serde_json::to_string_pretty(&doc).unwrap();
            let again: RegistryDocument = serde_json::from_str(&text).unwrap();
            assert_eq!(doc, again);
        }
    }
});
