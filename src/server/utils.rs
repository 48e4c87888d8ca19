//! HTTP server utility methods
//!
//! This module provides utility methods for the HttpServer.

use crate::server::server::HttpServer;
use crate::utils::error::PortalError;

impl HttpServer {
    /// Format a user-friendly error message for port binding failures
    pub(crate) fn format_bind_error(
        error: std::io::Error,
        bind_addr: &str,
        port: u16,
    ) -> PortalError {
        let error_str = error.to_string();

        // Check if it's an "address already in use" error
        if error.kind() == std::io::ErrorKind::AddrInUse
            || error_str.contains("Address already in use")
            || error_str.contains("os error 48")
            || error_str.contains("os error 98")
        {
            let message = format!(
                r#"
┌─────────────────────────────────────────────────────────────────┐
│  ❌ Error: Port {} is already in use
├─────────────────────────────────────────────────────────────────┤
│  Possible solutions:
│
│  1. Stop the other portal instance:
│     lsof -ti:{} | xargs kill
│
│  2. Use a different port:
│     PORTAL_PORT={} or server.port in config/portal.yaml
│
│  3. Check what's using it:
│     lsof -i:{}
└─────────────────────────────────────────────────────────────────┘
"#,
                port,
                port,
                port.saturating_add(1),
                port
            );
            PortalError::server(message)
        } else if error.kind() == std::io::ErrorKind::PermissionDenied
            || error_str.contains("Permission denied")
            || error_str.contains("os error 13")
        {
            let message = format!(
                r#"
┌─────────────────────────────────────────────────────────────────┐
│  ❌ Error: Permission denied for port {}
├─────────────────────────────────────────────────────────────────┤
│  Use a port >= 1024 (non-privileged):
│     PORTAL_PORT=8501
└─────────────────────────────────────────────────────────────────┘
"#,
                port
            );
            PortalError::server(message)
        } else {
            PortalError::server(format!("Failed to bind to {}: {}", bind_addr, error))
        }
    }
}
