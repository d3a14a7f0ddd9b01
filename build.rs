use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (unit tests) need nothing from here.
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATmega328P
    println!("cargo:rustc-link-arg=-mmcu=atmega328p");

    if env::var("CARGO_FEATURE_DEBUG").is_ok() {
        println!("cargo:warning=Verbose event log enabled (SEN/DBG tags)");
    }

    println!("cargo:warning=Building for ATmega328P at 16MHz");
}
