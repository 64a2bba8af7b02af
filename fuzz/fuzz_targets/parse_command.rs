#![no_main]

use hbaselite::shell::Grammar;
use libfuzzer_sys::fuzz_target;

// Fuzz target for the command grammar.
// Any input must parse to a command or an error, never panic.
fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(grammar) = Grammar::new() else {
        return;
    };
    let _ = grammar.parse(line);
});
