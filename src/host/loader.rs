use log::debug;

use super::event_loop::EventLoop;
use crate::common::{decode_data_url, RenderResult};

/// Terminal outcome of an asset load.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum AssetEvent {
    Load,
    Error,
    Abort,
}

/// Loads an asset and reports exactly one [`AssetEvent`] once the load
/// settles. Implementations are free to report synchronously or later.
pub trait AssetLoader {
    fn load(&self, src: &str, on_event: Box<dyn FnOnce(AssetEvent)>);
}

// Data url loader
//------------------------------------------------------------------------------

/// Decodes `data:` URL images on the host event loop. A host that cannot
/// materialize data URLs reports [`AssetEvent::Error`] for every load.
pub struct DataUrlLoader {
    events: EventLoop,
    data_urls: bool,
}

impl DataUrlLoader {
    pub fn new(events: EventLoop) -> Self {
        Self { events, data_urls: true }
    }

    pub fn without_data_urls(events: EventLoop) -> Self {
        Self { events, data_urls: false }
    }

    fn decode(src: &str) -> RenderResult<()> {
        let bytes = decode_data_url(src)?;
        image::load_from_memory(&bytes)?;
        Ok(())
    }
}

impl AssetLoader for DataUrlLoader {
    fn load(&self, src: &str, on_event: Box<dyn FnOnce(AssetEvent)>) {
        let src = src.to_string();
        let data_urls = self.data_urls;
        self.events.post(move || {
            if !data_urls {
                on_event(AssetEvent::Error);
                return;
            }
            match Self::decode(&src) {
                Ok(()) => on_event(AssetEvent::Load),
                Err(e) => {
                    debug!("Asset failed to load: {e}");
                    on_event(AssetEvent::Error);
                }
            }
        });
    }
}
