//! Async drivers that pull chunks from a byte stream into a [`StreamDecoder`].
//!
//! The only suspension point is waiting for the next chunk. Dropping the
//! returned future or stream cancels decoding; nothing needs releasing.

use deltastream_types::{Completion, DeltaSink, StreamUpdate};
use futures::{Stream, StreamExt};

use crate::config::DecoderConfig;
use crate::decoder::{Progress, StreamDecoder};

/// Decode `source` into `sink` with the default configuration.
///
/// See [`drive_with`].
pub async fn drive<St, B, E, S>(source: St, sink: &mut S) -> Result<Completion, E>
where
    St: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    S: DeltaSink + ?Sized,
{
    drive_with(DecoderConfig::default(), source, sink).await
}

/// Decode `source` into `sink`.
///
/// Chunks are pulled one at a time and stop being pulled once the sentinel
/// is seen. When the source ends, the pending buffer is flushed and
/// [`DeltaSink::complete`] is called.
///
/// A source error is returned as-is: no flush, no completion signal. Whatever
/// was already published stays with the sink.
pub async fn drive_with<St, B, E, S>(
    config: DecoderConfig,
    source: St,
    sink: &mut S,
) -> Result<Completion, E>
where
    St: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    S: DeltaSink + ?Sized,
{
    let mut decoder = StreamDecoder::with_config(config);
    let mut source = std::pin::pin!(source);

    while let Some(chunk) = source.next().await {
        let chunk = chunk?;
        if decoder.feed(chunk.as_ref(), sink) == Progress::Done {
            break;
        }
    }

    Ok(decoder.finish(sink))
}

/// Turn a byte stream into a stream of [`StreamUpdate`]s with the default
/// configuration.
pub fn updates<St, B, E>(source: St) -> impl Stream<Item = Result<StreamUpdate, E>>
where
    St: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    updates_with(DecoderConfig::default(), source)
}

/// Turn a byte stream into a stream of [`StreamUpdate`]s.
///
/// Yields one [`StreamUpdate::Content`] per applied delta, then a single
/// [`StreamUpdate::Complete`]. A source error is yielded once and ends the
/// stream without a completion.
pub fn updates_with<St, B, E>(
    config: DecoderConfig,
    source: St,
) -> impl Stream<Item = Result<StreamUpdate, E>>
where
    St: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    async_stream::stream! {
        let mut decoder = StreamDecoder::with_config(config);
        let mut source = std::pin::pin!(source);
        let mut snapshots: Vec<String> = Vec::new();

        while let Some(chunk_result) = source.next().await {
            let chunk = match chunk_result {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let progress = decoder.feed(chunk.as_ref(), &mut |s: &str| snapshots.push(s.to_owned()));
            for snapshot in snapshots.drain(..) {
                yield Ok(StreamUpdate::Content(snapshot));
            }
            if progress == Progress::Done {
                break;
            }
        }

        let completion = decoder.finish(&mut |s: &str| snapshots.push(s.to_owned()));
        for snapshot in snapshots.drain(..) {
            yield Ok(StreamUpdate::Content(snapshot));
        }
        yield Ok(StreamUpdate::Complete(completion));
    }
}
