/// Liveness probe. Public: the gate never challenges this path.
pub async fn health_check() -> &'static str {
    "OK"
}
