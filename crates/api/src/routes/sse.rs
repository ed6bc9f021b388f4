use std::future;

use axum::response::sse::{Event, KeepAlive, Sse};
use church_site_core::events::{EventBus, SiteEvent};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;

/// Server-sent events from the bus: `welcome` first, then every published
/// event that `keep` accepts. A listener that falls behind gets `reconnect`
/// and should refetch.
pub(crate) fn event_stream(
    bus: &EventBus,
    keep: fn(&SiteEvent) -> bool,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let receiver = bus.subscribe();

    let updates = stream::unfold(receiver, |mut receiver| async move {
        match receiver.recv().await {
            Ok(event) => Some((event, receiver)),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event listener lagged");
                Some((SiteEvent::Reconnect, receiver))
            }
            Err(RecvError::Closed) => None,
        }
    })
    .filter(move |event| future::ready(keep(event)));

    let events = stream::once(async { SiteEvent::Welcome })
        .chain(updates)
        .map(|event| Event::default().event(event.name()).json_data(&event));

    Sse::new(events).keep_alive(KeepAlive::default())
}

#[cfg(test)]
pub(crate) mod test_frames {
    use axum::body::{Body, BodyDataStream};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use futures::StreamExt;
    use tower::util::ServiceExt;

    /// Open an event stream and return its body.
    pub async fn open(app: &Router, uri: &str, token: Option<&str>) -> BodyDataStream {
        let mut request = Request::get(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = app
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
        response.into_body().into_data_stream()
    }

    /// Next SSE frame as text.
    pub async fn next_frame(body: &mut BodyDataStream) -> String {
        let chunk = body.next().await.unwrap().unwrap();
        String::from_utf8(chunk.to_vec()).unwrap()
    }
}
