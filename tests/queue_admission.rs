//! Integration tests for bounded image download concurrency
//!
//! These tests drive the image service with many simultaneous requests and
//! check that no more than the configured number of downloads are ever in
//! flight, using both a local HTTP server and an instrumented transport.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use image::{ImageFormat, Rgba, RgbaImage};
use topic_fetcher::app::{
    BoundedTaskQueue, ImageConfig, ImageFetchService, ResourceCache, Subsystem, SubsystemConfig,
    TaskQueueConfig, Transport,
};
use topic_fetcher::errors::TransportResult;
use url::Url;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png_bytes() -> Vec<u8> {
    let image = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

/// Transport that records how many requests overlap
#[derive(Debug, Default)]
struct OverlapTransport {
    current: AtomicUsize,
    max: AtomicUsize,
    total: AtomicUsize,
}

#[async_trait]
impl Transport for OverlapTransport {
    async fn get(&self, _url: &Url) -> TransportResult<Vec<u8>> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(25)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
        Ok(png_bytes())
    }
}

#[tokio::test]
async fn test_twelve_images_never_exceed_five_downloads() {
    let transport = Arc::new(OverlapTransport::default());
    let service = ImageFetchService::new(
        ImageConfig::default(),
        Arc::clone(&transport) as Arc<dyn Transport>,
        Arc::new(ResourceCache::new()),
        BoundedTaskQueue::new(5).unwrap(),
    )
    .unwrap();

    let paths: Vec<String> = (0..12).map(|i| format!("i/topic-{}.png", i)).collect();
    let images = join_all(paths.iter().map(|p| service.fetch_image(p))).await;

    assert!(images.iter().all(|image| !image.is_placeholder()));
    assert_eq!(transport.total.load(Ordering::SeqCst), 12);
    assert_eq!(transport.max.load(Ordering::SeqCst), 5);
    assert_eq!(service.queue().stats().peak_active, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bound_holds_across_threads() {
    let transport = Arc::new(OverlapTransport::default());
    let service = ImageFetchService::new(
        ImageConfig::default(),
        Arc::clone(&transport) as Arc<dyn Transport>,
        Arc::new(ResourceCache::new()),
        BoundedTaskQueue::with_config(TaskQueueConfig::new(3)).unwrap(),
    )
    .unwrap();

    let mut callers = Vec::new();
    for i in 0..24 {
        let service = service.clone();
        callers.push(tokio::spawn(async move {
            service.fetch_image(&format!("i/{}.png", i % 12)).await
        }));
    }
    for caller in callers {
        assert!(!caller.await.unwrap().is_placeholder());
    }

    assert!(transport.max.load(Ordering::SeqCst) <= 3);
    // Repeated paths are served from cache or joined in flight
    assert!(transport.total.load(Ordering::SeqCst) <= 24);
    assert_eq!(service.queue().available_slots(), 3);
}

#[tokio::test]
async fn test_twelve_images_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/i/.*\.png$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png_bytes())
                .set_delay(Duration::from_millis(50)),
        )
        .expect(12)
        .mount(&server)
        .await;

    let mut config = SubsystemConfig::new(format!("{}/topics", server.uri()));
    config.images.base_host = format!("{}/", server.uri());
    let subsystem = Subsystem::assemble(config).unwrap();

    let paths: Vec<String> = (0..12).map(|i| format!("i/{}.png", i)).collect();
    let images = join_all(paths.iter().map(|p| subsystem.images().fetch_image(p))).await;

    assert_eq!(images.len(), 12);
    assert!(images.iter().all(|image| !image.is_placeholder()));

    let stats = subsystem.queue().stats();
    assert!(stats.peak_active <= 5);
    assert_eq!(stats.completed, 12);
    assert_eq!(stats.active, 0);
}
