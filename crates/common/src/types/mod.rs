use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
}

/// Acknowledgment body returned by deletes and the landing route.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub status: &'static str,
}

impl Ack {
    pub fn ok() -> Self { Self { status: "ok" } }
}
