pub mod capability;
pub mod event_loop;
pub mod loader;
pub mod platform;

use std::rc::Rc;

pub use capability::{Capability, CapabilityGate, PROBE_ASSET};
pub use event_loop::EventLoop;
pub use loader::{AssetEvent, AssetLoader, DataUrlLoader};
pub use platform::Platform;

// Host
//------------------------------------------------------------------------------

/// The environment renderers live in. Cloning is cheap and every clone shares
/// the same event loop and capability gate, so the probe runs at most once per
/// host.
#[derive(Clone)]
pub struct Host {
    platform: Platform,
    device_pixel_ratio: f64,
    raster: bool,
    events: EventLoop,
    gate: CapabilityGate,
}

impl Host {
    pub fn builder() -> HostBuilder {
        HostBuilder::new()
    }

    /// Host with no platform quirks, a 2D pixel context and data URL support.
    pub fn headless() -> Self {
        HostBuilder::new().build()
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    pub fn supports_raster(&self) -> bool {
        self.raster
    }

    pub fn events(&self) -> &EventLoop {
        &self.events
    }

    pub fn gate(&self) -> &CapabilityGate {
        &self.gate
    }
}

pub struct HostBuilder {
    identity: String,
    device_pixel_ratio: f64,
    raster: bool,
    data_urls: bool,
    events: EventLoop,
    loader: Option<Rc<dyn AssetLoader>>,
}

impl HostBuilder {
    pub fn new() -> Self {
        Self {
            identity: String::new(),
            device_pixel_ratio: 1.0,
            raster: true,
            data_urls: true,
            events: EventLoop::new(),
            loader: None,
        }
    }

    pub fn identity(&mut self, identity: &str) -> &mut Self {
        self.identity = identity.to_string();
        self
    }

    pub fn device_pixel_ratio(&mut self, ratio: f64) -> &mut Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn raster(&mut self, raster: bool) -> &mut Self {
        self.raster = raster;
        self
    }

    /// Whether the stock loader materializes data URLs. Ignored once a custom
    /// loader is set.
    pub fn data_urls(&mut self, data_urls: bool) -> &mut Self {
        self.data_urls = data_urls;
        self
    }

    pub fn events(&mut self, events: EventLoop) -> &mut Self {
        self.events = events;
        self
    }

    pub fn loader(&mut self, loader: Rc<dyn AssetLoader>) -> &mut Self {
        self.loader = Some(loader);
        self
    }

    pub fn build(&self) -> Host {
        let platform = Platform::detect(&self.identity);
        let events = self.events.clone();
        let loader = self.loader.clone().unwrap_or_else(|| {
            let loader = if self.data_urls {
                DataUrlLoader::new(events.clone())
            } else {
                DataUrlLoader::without_data_urls(events.clone())
            };
            Rc::new(loader)
        });

        Host {
            platform,
            device_pixel_ratio: self.device_pixel_ratio,
            raster: self.raster,
            events,
            gate: CapabilityGate::new(loader),
        }
    }
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self::new()
    }
}


// Mount point
//------------------------------------------------------------------------------

/// Element a renderer is bound to. Its label mirrors the last rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    id: String,
    label: Option<String>,
}

impl MountPoint {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string(), label: None }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = Some(label.to_string());
    }
}
