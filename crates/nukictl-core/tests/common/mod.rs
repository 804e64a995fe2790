// Shared fixtures for core integration tests: an in-memory bridge whose
// behaviour is scripted per request.
#![allow(dead_code, clippy::unwrap_used)]

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Mutex;

use serde_json::Value;
use url::Url;

use nukictl_core::{
    BridgeContext, BridgeEndpoints, DeviceSelector, RawResponse, RetryPolicy, Transport,
};

type Handler = Box<dyn Fn(&Url, u32) -> Result<RawResponse, nukictl_api::Error> + Send + Sync>;

/// Scripted bridge. The handler receives the URL and the 1-based count of
/// calls made so far to that URL's path (including this one).
pub struct FakeBridge {
    handler: Handler,
    calls: Mutex<Vec<Url>>,
}

impl FakeBridge {
    pub fn new(
        handler: impl Fn(&Url, u32) -> Result<RawResponse, nukictl_api::Error> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Url> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls().iter().filter(|u| u.path() == path).count()
    }

    /// Paths of every call, in order (e.g. `["/list", "/lockAction"]`).
    pub fn paths(&self) -> Vec<String> {
        self.calls().iter().map(|u| u.path().to_owned()).collect()
    }
}

impl Transport for FakeBridge {
    fn get(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<RawResponse, nukictl_api::Error>> + Send {
        let nth = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(url.clone());
            u32::try_from(calls.iter().filter(|u| u.path() == url.path()).count()).unwrap()
        };
        std::future::ready((self.handler)(url, nth))
    }
}

pub fn json(status: u16, value: &Value) -> Result<RawResponse, nukictl_api::Error> {
    Ok(RawResponse::new(status, value.to_string()))
}

pub fn raw(status: u16, body: &str) -> Result<RawResponse, nukictl_api::Error> {
    Ok(RawResponse::new(status, body))
}

pub fn query(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

pub fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(NonZeroU32::new(max_attempts).unwrap())
}

pub fn endpoints() -> BridgeEndpoints {
    BridgeEndpoints::from_host("192.168.1.50", 8080, "1mytkn".to_string().into()).unwrap()
}

pub fn ctx(max_attempts: u32) -> BridgeContext {
    BridgeContext::with_endpoints(endpoints(), policy(max_attempts))
}

pub fn ctx_for(max_attempts: u32, device: DeviceSelector) -> BridgeContext {
    ctx(max_attempts).with_device(device)
}
