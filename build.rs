fn main() {
    // Propagate the ESP-IDF build environment captured by esp-idf-sys.
    // Host builds (tests, fuzzing) have no environment to forward.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
