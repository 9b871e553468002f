/// Binary entrypoint for the `twinpass` executable.
///
/// Keeps the binary thin — all business logic lives in the `twinpass_lib`
/// crate so unit tests can import library functions directly.
fn main() {
    twinpass_lib::run();
}
