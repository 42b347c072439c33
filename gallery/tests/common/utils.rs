use axum::response::Response;
use gallery_storage::{public_object_url, UploadableFile};
use http_body_util::BodyExt;

use super::test_setup::{TEST_BUCKET, TEST_REGION};

const BOUNDARY: &str = "gallery-test-boundary";

/// A file part of a multipart request: field name, file name, MIME type, contents
pub type TestFile<'a> = (&'a str, &'a str, &'a str, &'a str);

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Encode files as a `multipart/form-data` body, returning the content type and body
pub fn multipart_body(files: &[TestFile<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for (field, file_name, mime_type, contents) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(contents.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

pub fn png(name: &str) -> UploadableFile {
    UploadableFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

pub fn text(name: &str) -> UploadableFile {
    UploadableFile::new(name, "text/plain", b"just words".to_vec())
}

/// Display URL the gallery derives for `key` in the test bucket
pub fn display_url(key: &str) -> String {
    public_object_url(TEST_BUCKET, TEST_REGION, key)
}
