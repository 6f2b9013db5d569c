//! Write-transport capability probe.
//!
//! Browser targets cannot post to Google Forms directly, so writes there are
//! routed through a proxy. The probe is queried once when a builder is created.

/// Answers whether write requests should go through the proxy path.
pub trait WriteProxyProbe {
    fn should_use_proxy_for_write(&self) -> bool;
}

/// Probe resolved from the compilation target: `true` on `wasm32`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformProbe;

impl WriteProxyProbe for PlatformProbe {
    fn should_use_proxy_for_write(&self) -> bool {
        cfg!(target_arch = "wasm32")
    }
}

/// Probe with a fixed answer, handy for tests and embedders that already know.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub bool);

impl WriteProxyProbe for FixedProbe {
    fn should_use_proxy_for_write(&self) -> bool {
        self.0
    }
}

impl<F> WriteProxyProbe for F
where
    F: Fn() -> bool,
{
    fn should_use_proxy_for_write(&self) -> bool {
        self()
    }
}
