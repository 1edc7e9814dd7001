fn main() {
    // ESP-IDF build-environment wiring is only needed when the espidf
    // feature pulls in esp-idf-sys. Features reach build scripts as env
    // vars, so the check is at runtime.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
