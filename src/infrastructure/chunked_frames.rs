// Length-prefixed JSON frame streaming
use crate::application::streaming_service::StreamMessage;
use crate::infrastructure::http_response::brotli_compress;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;

pub const FRAME_CONTENT_TYPE: &str = "application/x-dashboard-frames";

/// Create a chunked response carrying one frame per message
pub async fn chunked_frame_stream<S>(
    stream: S,
    compress: bool,
) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = StreamMessage> + Send + 'static,
{
    let byte_stream = stream.then(move |msg| async move { encode_frame(&msg, compress).await });

    let body = Body::from_stream(byte_stream);

    // Frames are compressed one by one, so no Content-Encoding header.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, FRAME_CONTENT_TYPE)
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Encode one message: 4-byte big-endian length, then the (optionally
/// Brotli-compressed) JSON payload.
pub async fn encode_frame(msg: &StreamMessage, compress: bool) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(msg).map_err(std::io::Error::other)?;

    let payload = if compress {
        brotli_compress(json).await?
    } else {
        json
    };

    let length = payload.len() as u32;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Helper to create a streaming response from a receiver
pub async fn stream_from_receiver(
    mut rx: tokio::sync::mpsc::Receiver<StreamMessage>,
    compress: bool,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        while let Some(msg) = rx.recv().await {
            yield msg;
        }
    };

    match chunked_frame_stream(stream, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
