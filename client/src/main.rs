fn main() {
    prototype::app::bootstrap::run_client_app();
}
