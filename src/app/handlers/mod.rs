pub mod accounts;
pub mod admin;
pub mod network;

pub async fn healthz() -> &'static str {
    "OK"
}
