//! Server-Sent Events listener and frame parser for the push stream.

use std::fmt::Display;
use std::sync::Weak;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{EVENTS_TARGET, EventHub};
use crate::PaydeskClient;

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Exponential reconnect delay: starts at 0.5 s and doubles up to 10 s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    initial: Duration,
    current: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: INITIAL_BACKOFF,
            current: INITIAL_BACKOFF,
        }
    }
}

impl Backoff {
    /// The delay to wait now; the following one doubles.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(MAX_BACKOFF);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    /// Adopt a server-suggested `retry:` interval as the starting delay.
    pub fn set_initial(&mut self, initial: Duration) {
        self.initial = initial.clamp(Duration::from_millis(100), MAX_BACKOFF);
        self.current = self.initial;
    }
}

/// Spawn the reconnecting listener. The task ends once the hub is dropped.
pub(super) fn spawn_listener(client: PaydeskClient, hub: Weak<EventHub>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_event_id: Option<String> = None;
        let mut backoff = Backoff::default();

        loop {
            if hub.strong_count() == 0 {
                break;
            }

            match client.event_stream_request(last_event_id.as_deref()).send().await {
                Ok(response) if response.status().is_success() => {
                    info!(target: EVENTS_TARGET, url = %response.url(), "push stream connected");
                    backoff.reset();
                    let mut stream = response.bytes_stream();
                    if let Err(error) = pump(&mut stream, &hub, &mut last_event_id, &mut backoff).await {
                        warn!(target: EVENTS_TARGET, %error, "push stream error");
                    }
                }
                Ok(response) => {
                    warn!(target: EVENTS_TARGET, status = %response.status(), "push stream request failed");
                }
                Err(error) => {
                    warn!(target: EVENTS_TARGET, %error, "push stream connect error");
                }
            }

            let delay = backoff.next_delay();
            debug!(target: EVENTS_TARGET, delay_ms = delay.as_millis() as u64, "reconnecting push stream");
            tokio::time::sleep(delay).await;
        }
    })
}

/// Feed a byte stream through the frame parser into the hub until the
/// stream ends or fails.
pub(super) async fn pump<S, E>(
    stream: &mut S,
    hub: &Weak<EventHub>,
    last_event_id: &mut Option<String>,
    backoff: &mut Backoff,
) -> Result<(), E>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    let mut buf = Vec::<u8>::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        // The buffer held no terminator, so only its last three bytes can
        // start one.
        let mut scan_from = buf.len().saturating_sub(3);
        buf.extend_from_slice(&chunk);

        while let Some((end, separator_len)) = find_frame_end(&buf, scan_from) {
            if let Ok(text) = std::str::from_utf8(&buf[..end])
                && let Some(frame) = parse_sse_frame(text)
            {
                if let Some(id) = &frame.id {
                    *last_event_id = Some(id.clone());
                }
                if let Some(retry) = frame.retry {
                    backoff.set_initial(Duration::from_millis(retry));
                }
                if let Some(data) = frame.data {
                    let Some(hub) = hub.upgrade() else {
                        return Ok(());
                    };
                    hub.dispatch(&data);
                }
            }
            buf.drain(..end + separator_len);
            scan_from = 0;
        }
    }
    Ok(())
}

/// Locate the first blank-line frame terminator at or after `from`,
/// returning its offset and length.
fn find_frame_end(buf: &[u8], from: usize) -> Option<(usize, usize)> {
    (from..buf.len()).find_map(|i| {
        if buf[i..].starts_with(b"\r\n\r\n") {
            Some((i, 4))
        } else if buf[i..].starts_with(b"\n\n") {
            Some((i, 2))
        } else {
            None
        }
    })
}

/// A single parsed SSE frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SseFrame {
    pub data: Option<String>,
    pub id: Option<String>,
    pub event: Option<String>,
    pub retry: Option<u64>,
}

/// Parse the text of one frame. Returns `None` for comment-only frames.
pub fn parse_sse_frame(frame_text: &str) -> Option<SseFrame> {
    let mut data_lines = Vec::new();
    let mut frame = SseFrame::default();

    for line in frame_text.lines() {
        if line.starts_with(':') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        } else if let Some(rest) = line.strip_prefix("id:") {
            frame.id = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("event:") {
            frame.event = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("retry:") {
            frame.retry = rest.trim().parse().ok().or(frame.retry);
        }
    }

    if !data_lines.is_empty() {
        frame.data = Some(data_lines.join("\n"));
    }
    (frame != SseFrame::default()).then_some(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};

    use futures_util::stream;
    use paydesk_types::PushEvent;

    #[test]
    fn parses_data_id_event_and_retry() {
        let frame = parse_sse_frame("id: 7\nevent: message\nretry: 3000\ndata: {\"type\":\ndata: \"timeout\"}").unwrap();
        assert_eq!(frame.id.as_deref(), Some("7"));
        assert_eq!(frame.event.as_deref(), Some("message"));
        assert_eq!(frame.retry, Some(3000));
        assert_eq!(frame.data.as_deref(), Some("{\"type\":\n\"timeout\"}"));
    }

    #[test]
    fn comment_only_frames_are_skipped() {
        assert_eq!(parse_sse_frame(": keep-alive"), None);
        assert_eq!(parse_sse_frame(""), None);
    }

    #[test]
    fn finds_either_separator() {
        assert_eq!(find_frame_end(b"data: a\n\ndata: b", 0), Some((7, 2)));
        assert_eq!(find_frame_end(b"data: a\r\n\r\n", 0), Some((7, 4)));
        assert_eq!(find_frame_end(b"data: a\n", 0), None);
    }

    #[test]
    fn resumed_scan_finds_terminator_split_across_chunks() {
        let buf = b"data: a\r\n\r\n";
        // The previous chunk ended after "data: a\r\n\r"; scanning resumes
        // three bytes before that point.
        assert_eq!(find_frame_end(buf, 10 - 3), Some((7, 4)));
        assert_eq!(find_frame_end(b"data: a\n\n", 9 - 3), Some((7, 2)));
        assert_eq!(find_frame_end(b"data: a\n\ndata: b", 9), None);
    }

    #[test]
    fn backoff_doubles_to_cap_and_resets() {
        let mut backoff = Backoff::default();
        let delays: Vec<u128> = (0..7).map(|_| backoff.next_delay().as_millis()).collect();
        assert_eq!(delays, vec![500, 1000, 2000, 4000, 8000, 10_000, 10_000]);
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));

        backoff.set_initial(Duration::from_millis(3000));
        assert_eq!(backoff.next_delay(), Duration::from_millis(3000));
        assert_eq!(backoff.next_delay(), Duration::from_millis(6000));
    }

    #[tokio::test]
    async fn pump_dispatches_frames_split_across_chunks() {
        let hub = Arc::new(EventHub::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        hub.subscribe("test", move |event: &PushEvent| sink.lock().unwrap().push(event.clone()));

        let chunks = vec![
            Ok::<_, Infallible>(Bytes::from_static(b": hello\n\ndata: conn")),
            Ok(Bytes::from_static(b"ected\n\nid: 42\ndata: {\"type\":\"qr-code\",")),
            Ok(Bytes::from_static(b"\"content\":{\"code\":\"4006381333931\"}}\r\n\r\n")),
            Ok(Bytes::from_static(b"data: {\"type\":\"timeout\"}\n\n")),
        ];
        let mut stream = stream::iter(chunks);
        let mut last_event_id = None;
        let mut backoff = Backoff::default();

        pump(&mut stream, &Arc::downgrade(&hub), &mut last_event_id, &mut backoff)
            .await
            .unwrap();

        assert_eq!(last_event_id.as_deref(), Some("42"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                PushEvent::QrCode {
                    code: "4006381333931".into()
                },
                PushEvent::Timeout,
            ]
        );
    }

    #[tokio::test]
    async fn pump_handles_byte_sized_chunks() {
        let hub = Arc::new(EventHub::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        hub.subscribe("test", move |event: &PushEvent| sink.lock().unwrap().push(event.clone()));

        let wire: &'static [u8] = b"data: {\"type\":\"timeout\"}\r\n\r\ndata: {\"type\":\"remove-nfc-card\"}\n\n";
        let chunks: Vec<Result<Bytes, Infallible>> = wire.chunks(1).map(|byte| Ok(Bytes::from_static(byte))).collect();
        let mut stream = stream::iter(chunks);

        pump(&mut stream, &Arc::downgrade(&hub), &mut None, &mut Backoff::default())
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![PushEvent::Timeout, PushEvent::RemoveNfcCard]);
    }

    #[tokio::test]
    async fn pump_surfaces_stream_errors() {
        let hub = Arc::new(EventHub::new());
        let chunks = vec![Ok(Bytes::from_static(b"data: x\n\n")), Err("connection reset")];
        let mut stream = stream::iter(chunks);
        let result = pump(&mut stream, &Arc::downgrade(&hub), &mut None, &mut Backoff::default()).await;
        assert_eq!(result, Err("connection reset"));
    }
}
