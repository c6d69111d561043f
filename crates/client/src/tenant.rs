/// Where the client reads the current tenant identifier from.
///
/// Implemented by the session context; reads must not perform network I/O.
pub trait TenantSource: Send + Sync {
    fn tenant_identifier(&self) -> Option<String>;
}

/// Fixed tenant, used when the slug is known up front.
impl TenantSource for Option<String> {
    fn tenant_identifier(&self) -> Option<String> {
        self.clone().filter(|t| !t.trim().is_empty())
    }
}
