use std::io::Cursor;
use std::time::Duration;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qicomposite::composite::{CompositeBuilder, CompositeRequest};
use qicomposite::error::CompositeError;
use qicomposite::geometry::FrameShape;
use qicomposite::output;
use qicomposite::render::{HexColor, QrRenderRequest};
use qicomposite::source::HttpImageLoader;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GREEN: Rgba<u8> = Rgba([0, 160, 0, 255]);
const ORANGE: Rgba<u8> = Rgba([255, 165, 0, 255]);

fn png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

async fn render_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/create-qr-code/"))
        .and(query_param("data", "hello world"))
        .and(query_param("size", "200x200"))
        .and(query_param("color", "00a000"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png(200, 200, GREEN)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png(16, 16, ORANGE)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/down.png"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    server
}

fn base_url(server: &MockServer) -> String {
    QrRenderRequest::new("hello world", 200)
        .colors(HexColor([0, 160, 0]), HexColor::WHITE)
        .url(&format!("{}/v1/create-qr-code/", server.uri()))
}

fn builder() -> CompositeBuilder<HttpImageLoader> {
    CompositeBuilder::new(HttpImageLoader::new(Duration::from_secs(5)).unwrap())
}

#[tokio::test]
async fn test_rendered_code_with_circle_logo() {
    let server = render_server().await;
    let request = CompositeRequest::new(base_url(&server), 200)
        .unwrap()
        .with_logo(format!("{}/logo.png", server.uri()))
        .with_frame_shape(FrameShape::Circle);

    let bytes = builder().build(&request).await.unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();

    assert_eq!(img.dimensions(), (200, 200));
    assert_eq!(*img.get_pixel(0, 0), GREEN);
    assert_eq!(*img.get_pixel(100, 100), ORANGE);
    // Logo radius is 24px, frame radius 28px at this size.
    assert_eq!(*img.get_pixel(126, 100), Rgba([255, 255, 255, 255]));
    assert_eq!(*img.get_pixel(130, 100), GREEN);
}

#[tokio::test]
async fn test_logo_outage_degrades_to_base() {
    let server = render_server().await;
    let request = CompositeRequest::new(base_url(&server), 200)
        .unwrap()
        .with_logo(format!("{}/down.png", server.uri()));

    let bytes = builder().build(&request).await.unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert!(img.pixels().all(|p| *p == GREEN));
}

#[tokio::test]
async fn test_base_outage_fails() {
    let server = render_server().await;
    let request = CompositeRequest::new(format!("{}/down.png", server.uri()), 200)
        .unwrap()
        .with_logo(format!("{}/logo.png", server.uri()));

    let err = builder().build(&request).await.unwrap_err();
    assert!(matches!(err, CompositeError::BaseImageLoad(_)));
}

#[tokio::test]
async fn test_data_uri_logo_matches_remote_logo() {
    let server = render_server().await;
    let remote = CompositeRequest::new(base_url(&server), 200)
        .unwrap()
        .with_logo(format!("{}/logo.png", server.uri()))
        .with_frame_shape(FrameShape::rounded());
    let inline = remote
        .clone()
        .with_logo(output::to_data_url(&png(16, 16, ORANGE)));

    let builder = builder();
    assert_eq!(
        builder.build(&remote).await.unwrap(),
        builder.build(&inline).await.unwrap()
    );
}

#[tokio::test]
async fn test_concurrent_builds_are_independent() {
    let server = render_server().await;
    let request = CompositeRequest::new(base_url(&server), 200)
        .unwrap()
        .with_logo(format!("{}/logo.png", server.uri()))
        .with_frame_shape(FrameShape::Square);

    let builder = builder();
    let (first, second) = tokio::join!(builder.build(&request), builder.build(&request));
    assert_eq!(first.unwrap(), second.unwrap());
}
