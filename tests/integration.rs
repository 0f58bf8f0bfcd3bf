use image::{DynamicImage, GrayImage, ImageFormat};
use image_triage::{
    describe::{DescribeService, MockDescribeClient, OpenRouterClient, NO_DESCRIPTION},
    models::{Analysis, Config, ErrorBody, ImageSource},
    reduce::{OutboundImage, MAX_EDGE},
    Analyzer, Error,
};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn checkerboard_png(width: u32, height: u32) -> Vec<u8> {
    let gray = GrayImage::from_fn(width, height, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            image::Luma([255u8])
        } else {
            image::Luma([0u8])
        }
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn uniform_png(width: u32, height: u32) -> Vec<u8> {
    let gray = GrayImage::from_fn(width, height, |_, _| image::Luma([128u8]));
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn provider_config(base_url: &str) -> Config {
    Config {
        api_key: "test-key".to_string(),
        base_url: base_url.to_string(),
        model: "google/gemini-2.0-flash-exp:free".to_string(),
        referer: "http://localhost:5000".to_string(),
        title: "ImageBlurApp".to_string(),
    }
}

#[tokio::test]
async fn test_sharp_oversized_upload_yields_description_from_reduced_payload() {
    let mock = MockDescribeClient::new()
        .with_description_response("A high-contrast checkerboard pattern".to_string());
    let probe = mock.clone();
    let analyzer = Analyzer::with_describer(Box::new(mock));

    let analysis = analyzer
        .analyze(Some(checkerboard_png(4000, 3000)), None)
        .await
        .unwrap();

    assert_eq!(
        analysis,
        Analysis::described("A high-contrast checkerboard pattern".to_string())
    );

    // What would have crossed the wire must be inside the size bound.
    let received = probe.received_images();
    assert_eq!(received.len(), 1);
    let forwarded = image::load_from_memory(&received[0].bytes).unwrap();
    assert_eq!(forwarded.width().max(forwarded.height()), MAX_EDGE);
    assert_eq!(forwarded.width(), 640);
    assert_eq!(forwarded.height(), 480);
}

#[tokio::test]
async fn test_blurred_remote_image_short_circuits_before_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/soft.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(uniform_png(800, 600)))
        .mount(&server)
        .await;

    let mock = MockDescribeClient::new();
    let probe = mock.clone();
    let analyzer = Analyzer::with_describer(Box::new(mock));

    let analysis = analyzer
        .analyze(None, Some(format!("{}/soft.png", server.uri())))
        .await
        .unwrap();

    assert_eq!(analysis.result, "Blur");
    assert!(analysis
        .details
        .as_deref()
        .unwrap()
        .starts_with("Image is blurred (Score:"));
    assert_eq!(probe.get_call_count(), 0);
}

#[tokio::test]
async fn test_unreachable_url_is_a_400_class_error() {
    let analyzer = Analyzer::with_describer(Box::new(MockDescribeClient::new()));

    let err = analyzer
        .analyze(None, Some("http://nonexistent.invalid/x.jpg".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Acquisition(_)));
    assert_eq!(err.status_code(), 400);

    let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to fetch URL:"));
}

#[tokio::test]
async fn test_full_flow_against_simulated_provider() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("X-Title", "ImageBlurApp"))
        .and(body_string_contains("data:image/jpeg;base64,"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "A black and white grid"
                }
            }]
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let analyzer = Analyzer::new(&provider_config(&provider.uri()));
    let analysis = analyzer
        .analyze(Some(checkerboard_png(2000, 2000)), None)
        .await
        .unwrap();

    assert_eq!(analysis.result, "A black and white grid");
    assert_eq!(analysis.details, None);
}

#[tokio::test]
async fn test_provider_rate_limit_surfaces_its_status() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&provider)
        .await;

    let analyzer = Analyzer::new(&provider_config(&provider.uri()));
    let err = analyzer
        .analyze(Some(checkerboard_png(320, 240)), None)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 429);
}

#[tokio::test]
async fn test_shape_shifted_provider_response_degrades_to_sentinel() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "gen-42" })),
        )
        .mount(&provider)
        .await;

    let analyzer = Analyzer::new(&provider_config(&provider.uri()));
    let analysis = analyzer
        .analyze(Some(checkerboard_png(320, 240)), None)
        .await
        .unwrap();

    assert_eq!(analysis.result, NO_DESCRIPTION);
}

#[tokio::test]
async fn test_upload_takes_precedence_over_url() {
    // The URL points nowhere; if the upload wins, nothing tries to fetch it.
    let mock = MockDescribeClient::new();
    let analyzer = Analyzer::with_describer(Box::new(mock));

    let analysis = analyzer
        .analyze(
            Some(uniform_png(100, 100)),
            Some("http://nonexistent.invalid/ignored.jpg".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(analysis.result, "Blur");
}

#[tokio::test]
async fn test_resolved_source_can_drive_the_pipeline_directly() {
    let analyzer = Analyzer::with_describer(Box::new(
        MockDescribeClient::new().with_description_response("Direct".to_string()),
    ));

    let source = ImageSource::resolve(Some(checkerboard_png(300, 300)), None).unwrap();
    let analysis = analyzer.analyze_source(source).await.unwrap();
    assert_eq!(analysis.result, "Direct");
}

#[tokio::test]
async fn test_describe_service_is_directly_substitutable() {
    // Anything implementing the capability can stand in for the provider.
    let service: Box<dyn DescribeService> = Box::new(
        MockDescribeClient::new().with_description_response("Stand-in".to_string()),
    );

    let payload = OutboundImage {
        bytes: vec![0xFF, 0xD8, 0xFF],
        mime: "image/jpeg",
    };
    assert_eq!(service.describe(&payload).await.unwrap(), "Stand-in");

    let real: Box<dyn DescribeService> =
        Box::new(OpenRouterClient::new(&provider_config("http://localhost:0")));
    // Construction alone must not touch the network.
    drop(real);
}
